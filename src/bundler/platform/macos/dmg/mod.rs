//! macOS DMG disk image creator.
//!
//! Creates a compressed disk image of the whole distribution tree using the
//! native hdiutil tool, with the .app bundle relocated inside it first.
//!
//! - `creation` - bundle relocation and hdiutil invocation

mod creation;

pub use creation::{HDIUTIL, create_dmg, hdiutil_command, relocate_app_bundle};

use crate::bundler::{error::Result, process::CommandRunner, settings::Settings};
use std::path::PathBuf;

/// Bundle project as DMG disk image
///
/// # Process
/// 1. Move the finalized `{AppName}.app` into the distribution tree
/// 2. Generate the DMG from the tree using hdiutil with UDZO compression
///
/// # Returns
/// Vector containing path to created DMG file.
pub async fn bundle_project<R: CommandRunner>(
    settings: &Settings,
    runner: &R,
) -> Result<Vec<PathBuf>> {
    log::info!("Creating DMG for {}", settings.app_name());

    relocate_app_bundle(settings).await?;
    let dmg_path = create_dmg(settings, runner).await?;

    Ok(vec![dmg_path])
}

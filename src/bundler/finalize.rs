//! Platform finalizing: give the compiler output the application's name.
//!
//! The compiler always names its output after the entry module
//! (`main.dist/main.exe` on Windows, `main.app` on macOS). Finalizing renames
//! it to `{app_name}.exe` / `{app_name}.app`, exactly once per build.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    platform::Platform,
    settings::Settings,
    utils::fs::{RenameOutcome, rename_into_place},
};
use std::path::PathBuf;

/// Renames the compiler's fixed-name output for `platform`.
///
/// Re-running on an already finalized tree is a no-op. On macOS a bundle
/// that a previous run already moved into the distribution tree counts as
/// finalized, and its relocated path is returned. Returns the finalized path.
///
/// # Errors
///
/// - [`Error::MissingCompilerOutput`] when neither the fixed-name output nor
///   a finalized path exists
/// - [`Error::UnsupportedPlatform`] for platforms without an output convention
pub async fn finalize(settings: &Settings, platform: &Platform) -> Result<PathBuf> {
    let layout = settings.layout();
    let (Some(original), Some(finalized)) = (
        layout.compiler_output(platform),
        layout.finalized_output(platform),
    ) else {
        return Err(Error::UnsupportedPlatform(platform.to_string()));
    };

    match rename_into_place(&original, &finalized).await? {
        RenameOutcome::Renamed => {
            log::info!(
                "Renamed {} -> {}",
                original.display(),
                finalized.display()
            );
        }
        RenameOutcome::AlreadyInPlace => {
            log::warn!(
                "{} already finalized, skipping rename",
                finalized.display()
            );
        }
        RenameOutcome::SourceMissing => {
            if *platform == Platform::Darwin {
                let relocated = layout.relocated_app_bundle();
                if tokio::fs::try_exists(&relocated)
                    .await
                    .fs_context("checking relocated bundle", &relocated)?
                {
                    log::warn!(
                        "{} already finalized and relocated, skipping rename",
                        relocated.display()
                    );
                    return Ok(relocated);
                }
            }
            return Err(Error::MissingCompilerOutput { path: original });
        }
    }

    Ok(finalized)
}

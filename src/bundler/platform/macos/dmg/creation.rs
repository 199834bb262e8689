//! Core DMG creation logic using hdiutil.
//!
//! Handles the two halves of macOS packaging:
//! - Relocating the finalized .app bundle into the distribution tree
//! - Running hdiutil with the distribution tree as the image source

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    process::{CommandRunner, ProcessCommand, run_checked},
    settings::Settings,
    utils::fs::{RenameOutcome, rename_into_place},
};
use std::path::{Path, PathBuf};

/// Program name of the disk image utility.
pub const HDIUTIL: &str = "hdiutil";

/// Move `{dist}/{app}.app` into the distribution tree.
///
/// A bundle already relocated by an earlier run is reused.
///
/// # Returns
/// PathBuf to the relocated .app bundle
pub async fn relocate_app_bundle(settings: &Settings) -> Result<PathBuf> {
    let layout = settings.layout();
    let bundle = layout.app_bundle();
    let relocated = layout.relocated_app_bundle();

    match rename_into_place(&bundle, &relocated).await? {
        RenameOutcome::Renamed => {
            log::debug!(
                "Moved {} into {}",
                bundle.display(),
                layout.distribution_dir().display()
            );
        }
        RenameOutcome::AlreadyInPlace => {
            log::debug!("Using already relocated bundle: {}", relocated.display());
        }
        RenameOutcome::SourceMissing => {
            return Err(Error::MissingCompilerOutput { path: bundle });
        }
    }

    Ok(relocated)
}

/// hdiutil invocation imaging `source_dir` into a compressed `dmg_path`.
pub fn hdiutil_command(volume_name: &str, source_dir: &Path, dmg_path: &Path) -> ProcessCommand {
    ProcessCommand::new(HDIUTIL).args([
        "create".to_string(),
        "-volname".to_string(),
        volume_name.to_string(),
        "-srcfolder".to_string(),
        source_dir.display().to_string(),
        "-ov".to_string(), // Overwrite if exists
        "-format".to_string(),
        "UDZO".to_string(),
        dmg_path.display().to_string(),
    ])
}

/// Create the DMG from the distribution tree using hdiutil
///
/// # DMG Naming Convention
/// Format: `{AppName}-{Version}.dmg` directly under `dist_path`
///
/// # Returns
/// PathBuf to created DMG file
pub async fn create_dmg<R: CommandRunner>(settings: &Settings, runner: &R) -> Result<PathBuf> {
    let layout = settings.layout();
    let source_dir = layout.distribution_dir();
    let dmg_path = layout.dmg_path();

    // Remove old DMG if exists
    if tokio::fs::try_exists(&dmg_path).await.unwrap_or(false) {
        tokio::fs::remove_file(&dmg_path)
            .await
            .fs_context("removing previous DMG", &dmg_path)?;
    }

    log::info!("Creating DMG from {}...", source_dir.display());

    let command = hdiutil_command(settings.app_name(), &source_dir, &dmg_path);
    run_checked(runner, &command).await?;

    if !tokio::fs::try_exists(&dmg_path).await.unwrap_or(false) {
        return Err(Error::GenericError(format!(
            "hdiutil finished but no disk image was written to {}",
            dmg_path.display()
        )));
    }

    log::info!("✓ Created DMG: {}", dmg_path.display());

    Ok(dmg_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::{PackageSettings, SettingsBuilder};

    fn settings(dist: &Path) -> Settings {
        SettingsBuilder::new()
            .dist_path(dist)
            .package_settings(PackageSettings {
                app_name: "Foo".into(),
                version: "1.2".into(),
                ..Default::default()
            })
            .main_module("main.py")
            .build()
            .unwrap()
    }

    #[test]
    fn hdiutil_arguments() {
        let command = hdiutil_command("Foo", Path::new("dist/main.dist"), Path::new("dist/Foo-1.2.dmg"));
        assert_eq!(command.program(), "hdiutil");
        assert_eq!(
            command.get_args(),
            [
                "create",
                "-volname",
                "Foo",
                "-srcfolder",
                "dist/main.dist",
                "-ov",
                "-format",
                "UDZO",
                "dist/Foo-1.2.dmg",
            ]
        );
    }

    #[tokio::test]
    async fn relocates_bundle_into_tree() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let bundle = dir.path().join("Foo.app/Contents/MacOS");
        std::fs::create_dir_all(&bundle).unwrap();
        std::fs::write(bundle.join("Foo"), b"bin").unwrap();
        std::fs::create_dir_all(dir.path().join("main.dist")).unwrap();

        let relocated = relocate_app_bundle(&settings).await.unwrap();
        assert_eq!(relocated, dir.path().join("main.dist/Foo.app"));
        assert!(relocated.join("Contents/MacOS/Foo").is_file());
        assert!(!dir.path().join("Foo.app").exists());

        // Second run finds it in place.
        assert_eq!(relocate_app_bundle(&settings).await.unwrap(), relocated);
    }

    #[tokio::test]
    async fn missing_bundle_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = relocate_app_bundle(&settings(dir.path())).await.unwrap_err();
        assert!(matches!(err, Error::MissingCompilerOutput { .. }));
    }
}

//! Windows installer settings.

use serde::Deserialize;

/// Installer output filename convention.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallerNaming {
    /// `{app_name}-{version}-setup.exe`
    #[default]
    Setup,
    /// `{app_name}-{version}.exe`
    Plain,
}

/// Windows installer configuration.
///
/// # Configuration
///
/// ```toml
/// [windows]
/// run_at_startup = true
/// installer_naming = "plain"
/// ```
#[derive(Clone, Debug, Default)]
pub struct WindowsSettings {
    /// Register the application to start when the user logs in.
    ///
    /// Default: false
    pub run_at_startup: bool,

    /// Installer filename convention.
    ///
    /// Default: [`InstallerNaming::Setup`]
    pub installer_naming: InstallerNaming,
}

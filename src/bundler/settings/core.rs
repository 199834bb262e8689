//! Core Settings struct and implementations.

use super::{ArtifactLayout, CompilerSettings, PackageSettings, WindowsSettings};
use std::path::{Path, PathBuf};

/// Immutable build configuration.
///
/// Constructed once per build via [`SettingsBuilder`](super::SettingsBuilder),
/// which validates every field; read-only afterwards.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_installer::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_installer::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .dist_path("dist")
///     .package_settings(PackageSettings {
///         app_name: "MyApp".into(),
///         version: "1.2".into(),
///         ..Default::default()
///     })
///     .main_module("main.py")
///     .build()?;
///
/// assert_eq!(settings.layout().archive_path().file_name().unwrap(), "MyApp-1.2.zip");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Application metadata.
    package: PackageSettings,

    /// Compiler options.
    compiler: CompilerSettings,

    /// Windows installer options.
    windows: WindowsSettings,

    /// Root output directory.
    ///
    /// Default: `./dist`
    dist_path: PathBuf,
}

impl Settings {
    /// Returns the application name.
    pub fn app_name(&self) -> &str {
        &self.package.app_name
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the installer description.
    pub fn description(&self) -> &str {
        &self.package.description
    }

    /// Returns the author.
    pub fn author(&self) -> &str {
        &self.package.author
    }

    /// Returns the company name.
    pub fn company_name(&self) -> &str {
        &self.package.company_name
    }

    /// Returns the full application metadata.
    pub fn package(&self) -> &PackageSettings {
        &self.package
    }

    /// Returns the compiler options.
    pub fn compiler(&self) -> &CompilerSettings {
        &self.compiler
    }

    /// Returns the Windows installer options.
    pub fn windows(&self) -> &WindowsSettings {
        &self.windows
    }

    /// Returns the root output directory.
    pub fn dist_path(&self) -> &Path {
        &self.dist_path
    }

    /// Derives every artifact path for this build.
    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(
            &self.dist_path,
            &self.package.app_name,
            &self.package.version,
            &self.compiler.main_module,
        )
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        package: PackageSettings,
        compiler: CompilerSettings,
        windows: WindowsSettings,
        dist_path: PathBuf,
    ) -> Self {
        Self {
            package,
            compiler,
            windows,
            dist_path,
        }
    }
}

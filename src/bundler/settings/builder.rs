//! Builder for constructing Settings.

use super::{CompilerSettings, PackageSettings, Settings, WindowsSettings};
use crate::bundler::error::{Error, Result};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Default root output directory.
pub const DEFAULT_DIST_PATH: &str = "./dist";

/// Characters that cannot appear in a filename on at least one supported OS.
const RESERVED_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Builder for constructing [`Settings`].
///
/// All validation happens in [`build`](Self::build), before any external
/// program runs.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_installer::bundler::{CompilerSettings, PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_installer::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .dist_path("build/dist")
///     .package_settings(PackageSettings {
///         app_name: "MyApp".into(),
///         version: "2.1".into(),
///         ..Default::default()
///     })
///     .compiler_settings(CompilerSettings {
///         main_module: "app/main.py".into(),
///         include_packages: vec!["requests".into()],
///         ..Default::default()
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    dist_path: Option<PathBuf>,
    package_settings: Option<PackageSettings>,
    compiler_settings: CompilerSettings,
    windows_settings: WindowsSettings,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the root output directory.
    ///
    /// Default: `./dist`
    pub fn dist_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets application metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets compiler options.
    ///
    /// Default: [`CompilerSettings::default`]
    pub fn compiler_settings(mut self, settings: CompilerSettings) -> Self {
        self.compiler_settings = settings;
        self
    }

    /// Sets Windows installer options.
    pub fn windows_settings(mut self, settings: WindowsSettings) -> Self {
        self.windows_settings = settings;
        self
    }

    /// Sets the entry module handed to the compiler.
    pub fn main_module(mut self, module: impl Into<String>) -> Self {
        self.compiler_settings.main_module = module.into();
        self
    }

    /// Overrides the application version.
    ///
    /// Has no effect unless package settings are also provided.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        if let Some(package) = self.package_settings.as_mut() {
            package.version = version.into();
        }
        self
    }

    /// Reuses an existing distribution tree instead of compiling.
    pub fn skip_compile(mut self, skip: bool) -> Self {
        self.compiler_settings.skip_compile = skip;
        self
    }

    /// Kills external programs that run longer than `timeout`.
    pub fn process_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.compiler_settings.process_timeout = timeout;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when:
    /// - `package_settings` is missing
    /// - `app_name` is empty or not usable as a filename
    /// - `version` is empty
    /// - `dist_path` is not valid UTF-8
    /// - `main_module` is empty and compilation is not skipped
    pub fn build(self) -> Result<Settings> {
        let package = self
            .package_settings
            .ok_or_else(|| Error::InvalidConfig("package settings are required".into()))?;

        validate_app_name(&package.app_name)?;

        if package.version.trim().is_empty() {
            return Err(Error::InvalidConfig("version must not be empty".into()));
        }

        let dist_path = self
            .dist_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_PATH));
        if dist_path.to_str().is_none() {
            return Err(Error::InvalidConfig(format!(
                "dist_path is not valid UTF-8: {}",
                dist_path.display()
            )));
        }

        if !self.compiler_settings.skip_compile
            && self.compiler_settings.main_module.trim().is_empty()
        {
            return Err(Error::InvalidConfig(
                "main_module is required unless compilation is skipped".into(),
            ));
        }

        if self.compiler_settings.interpreter.trim().is_empty() {
            return Err(Error::InvalidConfig("interpreter must not be empty".into()));
        }

        Ok(Settings::new(
            package,
            self.compiler_settings,
            self.windows_settings,
            dist_path,
        ))
    }
}

/// Rejects names that cannot be used verbatim as a filename component.
fn validate_app_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidConfig("app_name must not be empty".into()));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| RESERVED_NAME_CHARS.contains(c) || c.is_control())
    {
        return Err(Error::InvalidConfig(format!(
            "app_name `{}` contains a character that is not allowed in filenames: {:?}",
            name, bad
        )));
    }

    if name == "." || name == ".." || name.ends_with('.') || name.ends_with(' ') {
        return Err(Error::InvalidConfig(format!(
            "app_name `{}` is not a valid filename",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(app_name: &str) -> PackageSettings {
        PackageSettings {
            app_name: app_name.into(),
            version: "1.0".into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_dist_path() {
        let settings = SettingsBuilder::new()
            .package_settings(package("Foo"))
            .main_module("main.py")
            .build()
            .unwrap();
        assert_eq!(settings.dist_path(), Path::new("./dist"));
        assert!(!settings.compiler().console);
        assert!(!settings.windows().run_at_startup);
    }

    #[test]
    fn missing_package_is_config_error() {
        let err = SettingsBuilder::new().main_module("main.py").build().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn rejects_empty_and_unsafe_names() {
        for name in ["", "   ", "a/b", "a\\b", "what?", "x:y", "..", "trailing.", "tab\tname"] {
            let err = SettingsBuilder::new()
                .package_settings(package(name))
                .main_module("main.py")
                .build()
                .unwrap_err();
            assert!(err.is_config_error(), "accepted {:?}", name);
        }
    }

    #[test]
    fn accepts_names_with_spaces_and_dashes() {
        let settings = SettingsBuilder::new()
            .package_settings(package("My Great-App"))
            .main_module("main.py")
            .build()
            .unwrap();
        assert_eq!(settings.app_name(), "My Great-App");
    }

    #[test]
    fn rejects_empty_version() {
        let err = SettingsBuilder::new()
            .package_settings(PackageSettings {
                app_name: "Foo".into(),
                version: String::new(),
                ..Default::default()
            })
            .main_module("main.py")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn main_module_required_unless_skipping_compile() {
        let err = SettingsBuilder::new()
            .package_settings(package("Foo"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("main_module"));

        assert!(SettingsBuilder::new()
            .package_settings(package("Foo"))
            .skip_compile(true)
            .build()
            .is_ok());
    }

    #[test]
    fn version_override_replaces_package_version() {
        let settings = SettingsBuilder::new()
            .package_settings(package("Foo"))
            .version("3.1.4")
            .main_module("main.py")
            .build()
            .unwrap();
        assert_eq!(settings.version_string(), "3.1.4");
    }
}

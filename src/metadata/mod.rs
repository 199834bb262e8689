//! Build file loading.
//!
//! A build file is a TOML document describing one application:
//!
//! ```toml
//! dist_path = "dist"
//!
//! [app]
//! name = "Foo"
//! version = "1.2"
//! author = "Jane Doe"
//!
//! [compiler]
//! main_module = "main.py"
//! include_packages = ["requests"]
//! data_files = ["config/default.toml=settings.toml"]
//!
//! [windows]
//! run_at_startup = true
//! ```

use crate::bundler::{
    CompilerSettings, DataMapping, InstallerNaming, PackageSettings, Settings, SettingsBuilder,
    WindowsSettings, settings::default_interpreter,
};
use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Parsed build file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildFile {
    /// Root output directory, relative to the working directory.
    pub dist_path: Option<PathBuf>,

    /// Application metadata (`[app]`)
    pub app: AppSection,

    /// Compiler options (`[compiler]`)
    #[serde(default)]
    pub compiler: CompilerSection,

    /// Windows installer options (`[windows]`)
    #[serde(default)]
    pub windows: WindowsSection,
}

/// `[app]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppSection {
    pub name: String,
    pub version: Option<String>,
    pub author: String,
    pub company_name: String,
    pub description: String,
    pub license: String,
    pub url: String,
    pub icon: String,
}

/// `[compiler]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CompilerSection {
    pub interpreter: Option<String>,
    pub main_module: String,
    pub console: bool,
    pub onefile: bool,
    pub include_modules: Vec<String>,
    pub include_packages: Vec<String>,
    pub ignore_imports: Vec<String>,
    pub data_file_packages: Vec<String>,
    /// `source` or `source=target` entries
    pub data_files: Vec<DataMapping>,
    /// `source` or `source=target` entries
    pub data_directories: Vec<DataMapping>,
    pub plugins: Vec<String>,
    /// Per-process timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[windows]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct WindowsSection {
    pub run_at_startup: bool,
    pub installer_naming: InstallerNaming,
}

/// Command-line values that take precedence over the build file.
#[derive(Debug, Clone, Default)]
pub struct BuildOverrides {
    pub dist_path: Option<PathBuf>,
    pub version: Option<String>,
    pub skip_compile: bool,
    pub process_timeout: Option<Duration>,
}

impl BuildFile {
    /// Parses build file contents; `path` is only used in error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|source| BundlerError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and parses the build file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BundlerError::Cli(CliError::ConfigNotFound {
                    path: path.to_path_buf(),
                })
            } else {
                BundlerError::Io(e)
            }
        })?;
        Self::parse(&contents, path)
    }

    /// Validates the build file into [`Settings`], applying `overrides`.
    pub fn into_settings(self, overrides: &BuildOverrides) -> Result<Settings> {
        let mut package = PackageSettings {
            app_name: self.app.name,
            author: self.app.author,
            company_name: self.app.company_name,
            description: self.app.description,
            license: self.app.license,
            url: self.app.url,
            icon: self.app.icon,
            ..Default::default()
        };
        if let Some(version) = self.app.version {
            package.version = version;
        }

        let compiler = CompilerSettings {
            interpreter: self
                .compiler
                .interpreter
                .unwrap_or_else(|| default_interpreter().to_string()),
            main_module: self.compiler.main_module,
            console: self.compiler.console,
            onefile: self.compiler.onefile,
            include_modules: self.compiler.include_modules,
            include_packages: self.compiler.include_packages,
            ignore_imports: self.compiler.ignore_imports,
            data_file_packages: self.compiler.data_file_packages,
            data_files: self.compiler.data_files,
            data_directories: self.compiler.data_directories,
            plugins: self.compiler.plugins,
            skip_compile: false,
            process_timeout: self.compiler.timeout_secs.map(Duration::from_secs),
        };

        let windows = WindowsSettings {
            run_at_startup: self.windows.run_at_startup,
            installer_naming: self.windows.installer_naming,
        };

        let mut builder = SettingsBuilder::new()
            .package_settings(package)
            .compiler_settings(compiler)
            .windows_settings(windows)
            .skip_compile(overrides.skip_compile);

        if let Some(dist_path) = overrides.dist_path.as_ref().or(self.dist_path.as_ref()) {
            builder = builder.dist_path(dist_path);
        }
        if let Some(version) = &overrides.version {
            builder = builder.version(version.clone());
        }
        if overrides.process_timeout.is_some() {
            builder = builder.process_timeout(overrides.process_timeout);
        }

        Ok(builder.build()?)
    }
}

/// Loads `path` and builds validated [`Settings`].
pub fn load_settings(path: &Path, overrides: &BuildOverrides) -> Result<Settings> {
    BuildFile::load(path)?.into_settings(overrides)
}

//! Compiler command synthesis.
//!
//! Turns [`Settings`] into the argument vector for the ahead-of-time
//! compiler. Each flag category has its own builder step so ordering and
//! formatting rules live in one place.

use super::version::pad_version;
use crate::bundler::{
    process::ProcessCommand,
    settings::{DataMapping, Settings},
};
use std::fmt;

/// Ordered compiler invocation.
///
/// Built by [`CompilerCommand::from_settings`], which is pure: the same
/// settings always produce the same tokens in the same order.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_installer::bundler::{compiler::CompilerCommand, PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_installer::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .package_settings(PackageSettings {
///         app_name: "Foo".into(),
///         version: "1.2".into(),
///         ..Default::default()
///     })
///     .main_module("main.py")
///     .build()?;
///
/// let command = CompilerCommand::from_settings(&settings);
/// assert!(command.args().contains(&"--windows-product-version=1.2.0.0".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCommand {
    program: String,
    args: Vec<String>,
}

impl CompilerCommand {
    /// Synthesizes the full compiler command line for `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let compiler = settings.compiler();
        let mut command = Self {
            program: compiler.interpreter.clone(),
            args: Vec::new(),
        };

        command
            .module_invocation()
            .repeated("--include-module", &compiler.include_modules)
            .repeated("--include-package", &compiler.include_packages)
            .data("--include-data-files", &compiler.data_files)
            .data("--include-data-dir", &compiler.data_directories)
            .repeated("--include-package-data", &compiler.data_file_packages)
            .repeated("--nofollow-import-to", &compiler.ignore_imports)
            .output_options(&settings.dist_path().display().to_string(), compiler.onefile)
            .console(compiler.console)
            .product_metadata(settings.company_name(), settings.app_name())
            .version(settings.version_string())
            .icon(&settings.package().icon)
            .repeated("--enable-plugin", &compiler.plugins)
            .entry_point(&compiler.main_module);

        command
    }

    /// Program that hosts the compiler.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program, in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Converts into a runnable command.
    pub fn to_process_command(&self) -> ProcessCommand {
        ProcessCommand::new(self.program.clone()).args(self.args.iter().cloned())
    }

    fn flag(&mut self, flag: &str) -> &mut Self {
        self.args.push(flag.to_string());
        self
    }

    fn option(&mut self, flag: &str, value: impl fmt::Display) -> &mut Self {
        self.args.push(format!("{}={}", flag, value));
        self
    }

    fn module_invocation(&mut self) -> &mut Self {
        self.flag("-m").flag("nuitka").flag("--standalone")
    }

    /// One `flag=value` per element, preserving input order.
    fn repeated(&mut self, flag: &str, values: &[String]) -> &mut Self {
        for value in values {
            self.option(flag, value);
        }
        self
    }

    /// One `flag=source=target` per mapping.
    fn data(&mut self, flag: &str, mappings: &[DataMapping]) -> &mut Self {
        for mapping in mappings {
            self.option(flag, mapping);
        }
        self
    }

    fn output_options(&mut self, output_dir: &str, onefile: bool) -> &mut Self {
        self.flag("--assume-yes-for-downloads")
            .option("--output-dir", output_dir);
        if onefile {
            self.flag("--onefile");
        }
        self
    }

    fn console(&mut self, console: bool) -> &mut Self {
        if !console {
            self.flag("--windows-disable-console")
                .flag("--macos-disable-console")
                .flag("--macos-create-app-bundle");
        }
        self
    }

    fn product_metadata(&mut self, company_name: &str, app_name: &str) -> &mut Self {
        if !company_name.is_empty() {
            self.option("--windows-company-name", company_name);
        }
        if !app_name.is_empty() {
            self.option("--windows-product-name", app_name)
                .option("--macos-app-name", app_name);
        }
        self
    }

    fn version(&mut self, version: &str) -> &mut Self {
        if !version.is_empty() {
            self.option("--windows-product-version", pad_version(version))
                .option("--macos-app-version", version);
        }
        self
    }

    fn icon(&mut self, icon: &str) -> &mut Self {
        if !icon.is_empty() {
            self.option("--windows-icon-from-ico", icon)
                .option("--macos-app-icon", icon);
        }
        self
    }

    fn entry_point(&mut self, main_module: &str) -> &mut Self {
        self.flag(main_module)
    }
}

impl fmt::Display for CompilerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_process_command(), f)
    }
}

//! Ahead-of-time compiler configuration.

use serde::Deserialize;
use std::{fmt, time::Duration};

/// One bundled data entry: a source path and where it lands in the
/// distribution tree.
///
/// A bare path maps to itself; `source=target` maps `source` to `target`.
///
/// ```
/// use kodegen_bundler_installer::bundler::DataMapping;
///
/// let plain = DataMapping::parse("assets/logo.png");
/// assert_eq!(plain.target, "assets/logo.png");
///
/// let mapped = DataMapping::parse("config/default.toml=settings.toml");
/// assert_eq!(mapped.source, "config/default.toml");
/// assert_eq!(mapped.target, "settings.toml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct DataMapping {
    /// Path on the build machine.
    pub source: String,
    /// Path inside the distribution tree.
    pub target: String,
}

impl DataMapping {
    /// Creates a mapping with an explicit target.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Parses `source` or `source=target`.
    ///
    /// Only the first `=` separates source from target.
    pub fn parse(item: &str) -> Self {
        match item.split_once('=') {
            Some((source, target)) if !target.is_empty() => Self::new(source, target),
            Some((source, _)) => Self::new(source, source),
            None => Self::new(item, item),
        }
    }
}

impl From<String> for DataMapping {
    fn from(item: String) -> Self {
        Self::parse(&item)
    }
}

impl fmt::Display for DataMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.source, self.target)
    }
}

/// Settings consumed by the command synthesizer.
#[derive(Debug, Clone)]
pub struct CompilerSettings {
    /// Program hosting the compiler (`{interpreter} -m nuitka`).
    ///
    /// Default: `python` on Windows hosts, `python3` elsewhere
    pub interpreter: String,

    /// Entry module handed to the compiler, e.g. `main.py`.
    pub main_module: String,

    /// Keep the console window attached.
    ///
    /// When false the compiler is asked to hide the console and produce an
    /// app bundle on macOS.
    pub console: bool,

    /// Produce a single-file executable.
    pub onefile: bool,

    /// Modules to include explicitly.
    pub include_modules: Vec<String>,

    /// Packages to include explicitly.
    pub include_packages: Vec<String>,

    /// Imports the compiler must not follow.
    pub ignore_imports: Vec<String>,

    /// Packages whose data files are bundled.
    pub data_file_packages: Vec<String>,

    /// Individual data files.
    pub data_files: Vec<DataMapping>,

    /// Whole data directories.
    pub data_directories: Vec<DataMapping>,

    /// Compiler plugins to enable, e.g. `numpy`.
    pub plugins: Vec<String>,

    /// Reuse an existing distribution tree instead of compiling.
    pub skip_compile: bool,

    /// Kill any external program that runs longer than this.
    ///
    /// Default: None (wait forever)
    pub process_timeout: Option<Duration>,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter().to_string(),
            main_module: String::new(),
            console: false,
            onefile: false,
            include_modules: Vec::new(),
            include_packages: Vec::new(),
            ignore_imports: Vec::new(),
            data_file_packages: Vec::new(),
            data_files: Vec::new(),
            data_directories: Vec::new(),
            plugins: Vec::new(),
            skip_compile: false,
            process_timeout: None,
        }
    }
}

/// Interpreter name for the host this binary was built for.
pub fn default_interpreter() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}

//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation
//! that clap's declarative attributes cannot express.

use crate::bundler::Platform;
use clap::Parser;
use std::{path::PathBuf, time::Duration};

/// Default build file name.
pub const DEFAULT_CONFIG: &str = "installer.toml";

/// Compile a Python application into a standalone tree and package it
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_installer",
    version,
    about = "Compile a Python application into a standalone tree and package it",
    long_about = "Compiles a Python entry module with Nuitka into a standalone distribution tree,
renames the output after the application, packages it as an NSIS installer (Windows)
or a disk image (macOS), and writes a zip update archive of the tree.

Usage:
  kodegen_bundler_installer --config installer.toml
  kodegen_bundler_installer --config installer.toml --app-version 1.4.2 --json
  kodegen_bundler_installer --skip-compile --platform windows

Exit codes: 0 success, 1 build failure, 2 invalid arguments or configuration,
3 unsupported platform."
)]
pub struct Args {
    /// Build file describing the application
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Root output directory (overrides the build file)
    #[arg(short = 'd', long, value_name = "PATH")]
    pub dist_path: Option<PathBuf>,

    /// Application version (overrides the build file)
    #[arg(long, value_name = "VERSION")]
    pub app_version: Option<String>,

    /// Target platform: windows, macos (default: the host OS)
    #[arg(short, long, value_name = "OS", env = "INSTALLER_PLATFORM")]
    pub platform: Option<String>,

    /// Reuse an existing distribution tree instead of running the compiler
    #[arg(long)]
    pub skip_compile: bool,

    /// Kill any external tool running longer than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Print the build report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Show every command and tool output line
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == Some(0) {
            return Err("--timeout-secs must be greater than zero".to_string());
        }

        if self.app_version.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err("--app-version cannot be empty".to_string());
        }

        if self.platform.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err("--platform cannot be empty".to_string());
        }

        Ok(())
    }

    /// Target platform, defaulting to the host.
    pub fn target_platform(&self) -> Platform {
        self.platform
            .as_deref()
            .map(Platform::from_os)
            .unwrap_or_else(Platform::current)
    }

    /// Per-process timeout, if any.
    pub fn process_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
    json: bool,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let output = super::OutputManager::new(args.verbose, args.quiet || args.json);

        Self {
            output,
            json: args.json,
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// True when the report goes to stdout as JSON.
    pub fn json(&self) -> bool {
        self.json
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

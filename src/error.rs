//! Error types for the command-line surface.
//!
//! Wraps pipeline errors with CLI and configuration failures, maps them to
//! process exit codes, and offers recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Exit code for a successful build.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for build failures (external tools, filesystem).
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for invalid arguments or configuration.
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when the target platform cannot be packaged.
pub const EXIT_UNSUPPORTED_PLATFORM: i32 = 3;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Build file parsing errors
    #[error("failed to parse {}: {source}", .path.display())]
    Toml {
        /// Build file path
        path: PathBuf,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },

    /// Pipeline errors
    #[error("Build failed: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Build file does not exist
    #[error("build file not found: {}", .path.display())]
    ConfigNotFound {
        /// Path that was looked up
        path: PathBuf,
    },
}

impl BundlerError {
    /// Process exit code for this error.
    ///
    /// `2` for argument and configuration errors, `3` for an unsupported
    /// platform, `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            BundlerError::Cli(_) | BundlerError::Toml { .. } => EXIT_CONFIG,
            BundlerError::Bundler(e) if e.is_unsupported_platform() => EXIT_UNSUPPORTED_PLATFORM,
            BundlerError::Bundler(e) if e.is_config_error() => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as PipelineError;

        match self {
            BundlerError::Cli(CliError::ConfigNotFound { path }) => vec![
                format!("Create {} or pass --config <PATH>", path.display()),
            ],
            BundlerError::Cli(_) => vec!["Run with --help to see the accepted arguments".into()],
            BundlerError::Toml { .. } => vec![
                "Check the build file against the [app], [compiler] and [windows] tables".into(),
            ],
            BundlerError::Bundler(e) if e.is_unsupported_platform() => vec![
                "Run the build on Windows or macOS".into(),
                "Or pass --platform windows|macos to package for another host".into(),
            ],
            BundlerError::Bundler(e) if e.is_config_error() => {
                vec!["Fix the reported field in the build file".into()]
            }
            BundlerError::Bundler(e) => match root_cause(e) {
                PipelineError::CommandFailed { .. } => vec![
                    "Make sure the tool is installed and on PATH".into(),
                ],
                PipelineError::CommandExited { .. } => vec![
                    "Run with -v to see the tool's full output".into(),
                ],
                PipelineError::Timeout { .. } => vec![
                    "Raise --timeout-secs or omit it to wait indefinitely".into(),
                ],
                PipelineError::MissingCompilerOutput { .. } => vec![
                    "Check that main_module matches the compiled entry point".into(),
                    "Remove --skip-compile if no previous build exists".into(),
                ],
                _ => vec!["Check the error message above for specific details".into()],
            },
            _ => vec!["Check the error message above for specific details".into()],
        }
    }
}

/// Innermost pipeline error beneath any context wrappers.
fn root_cause(error: &crate::bundler::Error) -> &crate::bundler::Error {
    match error {
        crate::bundler::Error::Context { source, .. } => root_cause(source),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::Error as PipelineError;

    fn in_step(error: PipelineError) -> BundlerError {
        BundlerError::Bundler(PipelineError::Context {
            context: "preflight step failed".into(),
            source: Box::new(error),
        })
    }

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(
            in_step(PipelineError::UnsupportedPlatform("linux".into())).exit_code(),
            EXIT_UNSUPPORTED_PLATFORM
        );
        assert_eq!(
            in_step(PipelineError::InvalidConfig("empty".into())).exit_code(),
            EXIT_CONFIG
        );
        assert_eq!(
            BundlerError::Cli(CliError::ConfigNotFound { path: "x.toml".into() }).exit_code(),
            EXIT_CONFIG
        );
        assert_eq!(
            in_step(PipelineError::CommandExited {
                command: "makensis".into(),
                code: Some(1),
                stderr: String::new(),
            })
            .exit_code(),
            EXIT_FAILURE
        );
    }

    #[test]
    fn suggestions_look_through_context() {
        let suggestions = in_step(PipelineError::Timeout {
            command: "hdiutil".into(),
            after: std::time::Duration::from_secs(5),
        })
        .recovery_suggestions();
        assert!(suggestions[0].contains("--timeout-secs"));
    }
}

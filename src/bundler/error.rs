//! Error types for the build pipeline.
//!
//! Every failure carries enough context (step, command, path) to diagnose
//! the problem without re-running in verbose mode.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the build pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Build configuration is missing a field or holds an invalid value.
    #[error("invalid build configuration: {0}")]
    InvalidConfig(String),

    /// The detected operating system has no packaging branch.
    #[error("unsupported platform `{0}`: only Windows and macOS can be packaged")]
    UnsupportedPlatform(String),

    /// An external program could not be launched.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Underlying launch error
        #[source]
        error: std::io::Error,
    },

    /// An external program ran but exited unsuccessfully.
    #[error("`{command}` exited with {}{}", exit_label(*.code), stderr_suffix(.stderr))]
    CommandExited {
        /// Rendered command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// An external program exceeded the configured timeout and was killed.
    #[error("`{command}` timed out after {}s", .after.as_secs())]
    Timeout {
        /// Rendered command line
        command: String,
        /// Configured limit
        after: Duration,
    },

    /// The compiler did not leave its output where it always does.
    #[error("compiler output not found at {}", .path.display())]
    MissingCompilerOutput {
        /// Expected fixed-name output path
        path: PathBuf,
    },

    /// Filesystem operation failed on a known path.
    #[error("{context} ({}): {source}", .path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Additional context wrapped around another error.
    #[error("{context}: {source}")]
    Context {
        /// What was being done
        context: String,
        /// Wrapped error
        #[source]
        source: Box<Error>,
    },

    /// IO errors without path context.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Archive writing errors.
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal errors.
    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix stripping errors.
    #[error("path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl Error {
    /// True for errors raised before any external process started.
    pub fn is_config_error(&self) -> bool {
        match self {
            Error::InvalidConfig(_) => true,
            Error::Context { source, .. } => source.is_config_error(),
            _ => false,
        }
    }

    /// True when the build stopped because the platform has no packaging branch.
    pub fn is_unsupported_platform(&self) -> bool {
        match self {
            Error::UnsupportedPlatform(_) => true,
            Error::Context { source, .. } => source.is_unsupported_platform(),
            _ => false,
        }
    }
}

/// Attach path context to IO results.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Attach a human-readable context message to a result or option.
pub trait Context<T> {
    /// Wraps the error (or `None`) with a fixed message.
    fn context<C: Display>(self, context: C) -> Result<T>;

    /// Wraps the error (or `None`) with a lazily built message.
    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::Context {
            context: context.to_string(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Context {
            context: f().to_string(),
            source: Box::new(e.into()),
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($fmt:literal, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

//! Installer build pipeline library.
//!
//! Compiles a Python entry module into a standalone distribution tree and
//! packages it:
//! - Windows installers (.exe via NSIS)
//! - macOS disk images (.dmg via hdiutil)
//! - a zip update archive of the tree on both
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};

//! Build pipeline: compile, finalize, package, archive.
//!
//! The pipeline turns a validated [`Settings`] record into distributable
//! artifacts:
//!
//! 1. [`compiler`] synthesizes the ahead-of-time compiler command and runs it
//! 2. [`finalize`] renames the compiler's fixed-name output to the app name
//! 3. [`platform`] produces the native installer (Windows) or disk image (macOS)
//! 4. [`archive`] writes the update `.zip` of the distribution tree
//!
//! [`Bundler`] sequences the steps. Every external program runs through the
//! [`CommandRunner`] seam so tests can substitute a fake.

pub mod archive;
mod builder;
pub mod compiler;
pub mod error;
pub mod finalize;
pub mod platform;
pub mod process;
pub mod settings;
pub(crate) mod utils;

pub use builder::{ArtifactKind, BuildReport, BuildState, BuildStep, BundledArtifact, Bundler};
pub use error::{Error, Result};
pub use platform::Platform;
pub use process::{CommandRunner, ProcessCommand, ProcessOutput, SystemRunner};
pub use settings::{
    ArtifactLayout, CompilerSettings, DataMapping, InstallerNaming, PackageSettings, Settings,
    SettingsBuilder, WindowsSettings,
};

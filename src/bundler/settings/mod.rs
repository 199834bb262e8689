//! Build configuration.
//!
//! [`Settings`] is the immutable record describing one build: application
//! metadata, compiler options and Windows installer options. It is assembled
//! and validated by [`SettingsBuilder`]; artifact paths are derived from it
//! on demand through [`ArtifactLayout`].

mod builder;
mod compiler;
mod core;
mod layout;
mod package;
mod windows;

pub use builder::{DEFAULT_DIST_PATH, SettingsBuilder};
pub use compiler::{CompilerSettings, DataMapping, default_interpreter};
pub use self::core::Settings;
pub use layout::ArtifactLayout;
pub use package::PackageSettings;
pub use windows::{InstallerNaming, WindowsSettings};

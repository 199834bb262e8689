//! Platform detection and packaging dispatch.
//!
//! The packaging branch is chosen once per build from an explicit
//! [`Platform`] value:
//!
//! - **Windows**: NSIS installer built from the distribution tree
//! - **Darwin**: `.dmg` disk image built with `hdiutil`
//! - anything else: [`Error::UnsupportedPlatform`]

pub mod macos;
pub mod windows;

use crate::bundler::{
    error::{Error, Result},
    process::CommandRunner,
    settings::Settings,
};
use std::{convert::Infallible, fmt, path::PathBuf, str::FromStr};

/// Operating system the build packages for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Windows: native installer.
    Windows,
    /// macOS: disk image.
    Darwin,
    /// Any other OS identifier.
    Unsupported(String),
}

impl Platform {
    /// Platform of the running host.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Parses an OS identifier such as `std::env::consts::OS` or
    /// `platform.system()` output. Matching is case-insensitive.
    pub fn from_os(os: &str) -> Self {
        match os.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" | "win64" => Platform::Windows,
            "macos" | "darwin" | "osx" => Platform::Darwin,
            other => Platform::Unsupported(other.to_string()),
        }
    }

    /// True for platforms with a packaging branch.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unsupported(_))
    }
}

impl FromStr for Platform {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_os(s))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => f.write_str("windows"),
            Platform::Darwin => f.write_str("macos"),
            Platform::Unsupported(os) => f.write_str(os),
        }
    }
}

/// Produces the platform's installable artifact from the finalized tree.
///
/// Returns the paths of the created artifacts.
pub async fn package<R: CommandRunner>(
    settings: &Settings,
    platform: &Platform,
    runner: &R,
) -> Result<Vec<PathBuf>> {
    match platform {
        Platform::Windows => windows::nsis::bundle_project(settings, runner).await,
        Platform::Darwin => macos::dmg::bundle_project(settings, runner).await,
        Platform::Unsupported(os) => Err(Error::UnsupportedPlatform(os.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_os_identifiers() {
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("Windows"), Platform::Windows);
        assert_eq!(Platform::from_os("macos"), Platform::Darwin);
        assert_eq!(Platform::from_os("Darwin"), Platform::Darwin);
        assert_eq!(
            Platform::from_os("Linux"),
            Platform::Unsupported("linux".into())
        );
    }

    #[test]
    fn only_two_platforms_are_supported() {
        assert!(Platform::Windows.is_supported());
        assert!(Platform::Darwin.is_supported());
        assert!(!"freebsd".parse::<Platform>().unwrap().is_supported());
    }

    #[test]
    fn display_round_trips() {
        for platform in [Platform::Windows, Platform::Darwin, Platform::Unsupported("haiku".into())] {
            assert_eq!(Platform::from_os(&platform.to_string()), platform);
        }
    }
}

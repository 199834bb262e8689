//! Build results.

use super::BuildState;
use serde::Serialize;
use std::{fmt, path::PathBuf};

/// Kind of file the pipeline produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Windows installer executable.
    Installer,
    /// macOS `.dmg`.
    DiskImage,
    /// `.zip` of the distribution tree.
    UpdateArchive,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Installer => f.write_str("installer"),
            ArtifactKind::DiskImage => f.write_str("disk image"),
            ArtifactKind::UpdateArchive => f.write_str("update archive"),
        }
    }
}

/// One produced file with its size and SHA-256.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundledArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the file contents.
    pub checksum: String,
}

/// Summary of a completed build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub app_name: String,
    pub version: String,
    pub platform: String,
    pub state: BuildState,
    /// Finalized executable or application bundle.
    pub finalized: PathBuf,
    pub artifacts: Vec<BundledArtifact>,
}

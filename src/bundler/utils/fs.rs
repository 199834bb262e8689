//! File system utilities for the pipeline.
//!
//! Idempotent directory creation and removal, rename-into-place for
//! re-runnable finalizing, and sorted regular-file listing of a tree.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_path(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes a file or directory tree if it exists.
pub async fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()), // Idempotent
        Err(e) => return Err(e).fs_context("inspecting path", path),
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    removed.fs_context("removing existing path", path)
}

/// Outcome of [`rename_into_place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The source was moved to the target.
    Renamed,
    /// The source is gone and the target already exists (previous run).
    AlreadyInPlace,
    /// Neither source nor target exists.
    SourceMissing,
}

/// Moves `from` to `to`, tolerating a previous run that already did so.
///
/// A stale `to` left by an earlier build is replaced when `from` exists.
/// Works for files and directories (e.g. `.app` bundles).
pub async fn rename_into_place(from: &Path, to: &Path) -> Result<RenameOutcome> {
    let from_exists = fs::try_exists(from)
        .await
        .fs_context("checking rename source", from)?;
    let to_exists = fs::try_exists(to)
        .await
        .fs_context("checking rename target", to)?;

    if !from_exists {
        return Ok(if to_exists {
            RenameOutcome::AlreadyInPlace
        } else {
            RenameOutcome::SourceMissing
        });
    }

    if from == to {
        return Ok(RenameOutcome::AlreadyInPlace);
    }

    if to_exists && !is_case_alias(from, to).await? {
        log::debug!("Replacing stale {}", to.display());
        remove_path(to).await?;
    }

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating rename target directory", parent)?;
    }

    fs::rename(from, to)
        .await
        .fs_context(&format!("renaming {}", from.display()), to)?;

    Ok(RenameOutcome::Renamed)
}

/// True when `to` only "exists" because a case-insensitive file system
/// resolves it to `from` (`main.exe` vs `Main.exe` on NTFS or APFS).
///
/// The parent directory is listed; a distinct entry named exactly like `to`
/// means a real, separate file.
async fn is_case_alias(from: &Path, to: &Path) -> Result<bool> {
    let (Some(from_name), Some(to_name)) = (from.file_name(), to.file_name()) else {
        return Ok(false);
    };
    if from.parent() != to.parent() || from_name == to_name || !from_name.eq_ignore_ascii_case(to_name) {
        return Ok(false);
    }

    let parent = match from.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut entries = fs::read_dir(parent)
        .await
        .fs_context("listing rename directory", parent)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("listing rename directory", parent)?
    {
        if entry.file_name() == to_name {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Lists every regular file under `root`, sorted by path.
///
/// Symlinks are not followed and directories are not listed.
pub async fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let root = root.to_path_buf();

    // Offload blocking work to dedicated thread pool
    tokio::task::spawn_blocking(move || list_files_blocking(&root))
        .await
        .map_err(|e| Error::GenericError(format!("File listing task panicked: {}", e)))?
}

/// Blocking variant of [`list_files`].
pub fn list_files_blocking(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

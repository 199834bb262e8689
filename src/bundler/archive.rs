//! Update archive creation.
//!
//! Writes `{dist}/{app_name}-{version}.zip` containing every regular file of
//! the distribution tree. Entry names are relative to the tree root with `/`
//! separators, so extracting the archive into an empty directory reproduces
//! the tree.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::Settings,
    utils::fs::list_files_blocking,
};
use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Component, Path, PathBuf},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Creates the update archive for the finalized distribution tree.
///
/// Returns the archive path.
pub async fn create_update_archive(settings: &Settings) -> Result<PathBuf> {
    let layout = settings.layout();
    let source_dir = layout.distribution_dir();
    let archive_path = layout.archive_path();

    if !tokio::fs::try_exists(&source_dir)
        .await
        .fs_context("checking distribution tree", &source_dir)?
    {
        return Err(Error::MissingCompilerOutput { path: source_dir });
    }

    log::info!(
        "Archiving {} into {}",
        source_dir.display(),
        archive_path.display()
    );

    let entries = {
        let source_dir = source_dir.clone();
        let archive_path = archive_path.clone();
        tokio::task::spawn_blocking(move || write_archive(&source_dir, &archive_path))
            .await
            .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))??
    };

    log::info!("✓ Archived {} files: {}", entries, archive_path.display());

    Ok(archive_path)
}

/// Writes every regular file under `source_dir` into a deflate zip at
/// `archive_path`, replacing any existing archive. Returns the entry count.
///
/// The archive is written next to its final path and renamed into place
/// once complete. A failed write removes the partial file.
pub fn write_archive(source_dir: &Path, archive_path: &Path) -> Result<usize> {
    let files = list_files_blocking(source_dir)?;

    let partial_path = archive_path.with_extension("zip.partial");
    if let Err(error) = write_entries(source_dir, &files, &partial_path) {
        match std::fs::remove_file(&partial_path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                log::warn!("Failed to remove {}: {}", partial_path.display(), e);
            }
            _ => {}
        }
        return Err(error);
    }

    std::fs::rename(&partial_path, archive_path).fs_context("moving archive into place", archive_path)?;

    Ok(files.len())
}

fn write_entries(source_dir: &Path, files: &[PathBuf], partial_path: &Path) -> Result<()> {
    let file = File::create(partial_path).fs_context("creating archive", partial_path)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));

    for path in files {
        let name = entry_name(path.strip_prefix(source_dir)?)?;
        let options = entry_options(path)?;

        writer.start_file(name, options)?;
        let mut input = File::open(path).fs_context("opening file for archiving", path)?;
        io::copy(&mut input, &mut writer).fs_context("compressing file", path)?;
    }

    let mut buffered = writer.finish()?;
    io::Write::flush(&mut buffered).fs_context("flushing archive", partial_path)?;
    Ok(())
}

/// Joins path components with `/` regardless of host separator.
fn entry_name(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(|| {
                Error::GenericError(format!(
                    "cannot archive non-UTF-8 path: {}",
                    relative.display()
                ))
            })?),
            other => {
                return Err(Error::GenericError(format!(
                    "unexpected path component {:?} in {}",
                    other,
                    relative.display()
                )));
            }
        }
    }
    Ok(parts.join("/"))
}

fn entry_options(path: &Path) -> Result<SimpleFileOptions> {
    let metadata = std::fs::metadata(path).fs_context("reading file metadata", path)?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(metadata.len() >= u32::MAX as u64);

    #[cfg(unix)]
    let options = {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode())
    };

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn entry_names_use_forward_slashes() {
        let relative: PathBuf = ["lib", "site", "mod.pyd"].iter().collect();
        assert_eq!(entry_name(&relative).unwrap(), "lib/site/mod.pyd");
    }

    #[test]
    fn archive_contains_relative_paths_only() {
        let tree = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tree.path().join("sub/deeper")).unwrap();
        std::fs::create_dir_all(tree.path().join("empty")).unwrap();
        std::fs::write(tree.path().join("Foo.exe"), b"MZ").unwrap();
        std::fs::write(tree.path().join("sub/deeper/data.bin"), [0u8, 1, 2, 3]).unwrap();

        let out = tempfile::tempdir().unwrap();
        let archive_path = out.path().join("Foo-1.2.zip");
        assert_eq!(write_archive(tree.path(), &archive_path).unwrap(), 2);
        assert!(!out.path().join("Foo-1.2.zip.partial").exists());

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(names, ["Foo.exe", "sub/deeper/data.bin"]);

        let mut entry = archive.by_name("sub/deeper/data.bin").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, [0u8, 1, 2, 3]);
    }

    #[test]
    fn existing_archive_is_replaced() {
        let tree = tempfile::tempdir().unwrap();
        std::fs::write(tree.path().join("only.txt"), b"x").unwrap();
        let out = tempfile::tempdir().unwrap();
        let archive_path = out.path().join("a.zip");
        std::fs::write(&archive_path, b"not a zip").unwrap();

        write_archive(tree.path(), &archive_path).unwrap();
        let archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_write_leaves_no_partial_archive() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let tree = tempfile::tempdir().unwrap();
        std::fs::write(tree.path().join("a.txt"), b"a").unwrap();
        std::fs::write(tree.path().join(OsStr::from_bytes(b"b\xff.txt")), b"b").unwrap();
        let out = tempfile::tempdir().unwrap();
        let archive_path = out.path().join("Foo-1.2.zip");

        let err = write_archive(tree.path(), &archive_path).unwrap_err();
        assert!(err.to_string().contains("non-UTF-8"));
        assert!(!out.path().join("Foo-1.2.zip.partial").exists());
        assert!(!archive_path.exists());
    }
}

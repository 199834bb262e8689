//! Derived artifact paths.

use crate::bundler::Platform;
use std::path::{Path, PathBuf};

use super::InstallerNaming;

/// Stem used when the entry module has none (e.g. an empty `main_module`).
const DEFAULT_MODULE_STEM: &str = "main";

/// Every path the pipeline reads or writes, derived from `dist_path`,
/// `app_name`, `version` and the entry module's stem.
///
/// Obtained through [`Settings::layout`](super::Settings::layout) and
/// recomputed on every call; nothing here is cached between steps.
///
/// The compiler names its output after the entry module: `main.py` yields
/// `main.dist/` with `main.exe` inside on Windows, and `main.app` next to
/// it on macOS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    dist_path: PathBuf,
    app_name: String,
    version: String,
    module_stem: String,
}

impl ArtifactLayout {
    pub(super) fn new(dist_path: &Path, app_name: &str, version: &str, main_module: &str) -> Self {
        let module_stem = Path::new(main_module)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MODULE_STEM)
            .to_string();

        Self {
            dist_path: dist_path.to_path_buf(),
            app_name: app_name.to_string(),
            version: version.to_string(),
            module_stem,
        }
    }

    /// Root output directory.
    pub fn dist_path(&self) -> &Path {
        &self.dist_path
    }

    /// File stem of the entry module.
    pub fn module_stem(&self) -> &str {
        &self.module_stem
    }

    /// `{app_name}-{version}`, the base of every packaged artifact name.
    pub fn artifact_base_name(&self) -> String {
        format!("{}-{}", self.app_name, self.version)
    }

    /// Distribution tree produced by the compiler: `{dist}/{stem}.dist`.
    pub fn distribution_dir(&self) -> PathBuf {
        self.dist_path.join(format!("{}.dist", self.module_stem))
    }

    /// Fixed-name compiler output for a platform, before finalizing.
    ///
    /// Returns `None` for unsupported platforms.
    pub fn compiler_output(&self, platform: &Platform) -> Option<PathBuf> {
        match platform {
            Platform::Windows => Some(
                self.distribution_dir()
                    .join(format!("{}.exe", self.module_stem)),
            ),
            Platform::Darwin => Some(self.dist_path.join(format!("{}.app", self.module_stem))),
            Platform::Unsupported(_) => None,
        }
    }

    /// Application-named output for a platform, after finalizing.
    pub fn finalized_output(&self, platform: &Platform) -> Option<PathBuf> {
        match platform {
            Platform::Windows => Some(self.main_executable()),
            Platform::Darwin => Some(self.app_bundle()),
            Platform::Unsupported(_) => None,
        }
    }

    /// Finalized Windows executable: `{dist}/{stem}.dist/{app_name}.exe`.
    pub fn main_executable(&self) -> PathBuf {
        self.distribution_dir()
            .join(format!("{}.exe", self.app_name))
    }

    /// Finalized macOS bundle: `{dist}/{app_name}.app`.
    pub fn app_bundle(&self) -> PathBuf {
        self.dist_path.join(format!("{}.app", self.app_name))
    }

    /// macOS bundle after relocation into the distribution tree.
    pub fn relocated_app_bundle(&self) -> PathBuf {
        self.distribution_dir()
            .join(format!("{}.app", self.app_name))
    }

    /// Windows installer output path.
    pub fn installer_path(&self, naming: InstallerNaming) -> PathBuf {
        let file_name = match naming {
            InstallerNaming::Setup => format!("{}-setup.exe", self.artifact_base_name()),
            InstallerNaming::Plain => format!("{}.exe", self.artifact_base_name()),
        };
        self.dist_path.join(file_name)
    }

    /// Generated installer script, kept outside the distribution tree so it
    /// never lands in the archive.
    pub fn installer_script_path(&self) -> PathBuf {
        self.dist_path
            .join("nsis")
            .join(format!("{}.nsi", self.app_name))
    }

    /// macOS disk image output path.
    pub fn dmg_path(&self) -> PathBuf {
        self.dist_path
            .join(format!("{}.dmg", self.artifact_base_name()))
    }

    /// Update archive output path.
    pub fn archive_path(&self) -> PathBuf {
        self.dist_path
            .join(format!("{}.zip", self.artifact_base_name()))
    }
}

//! Windows NSIS installer creation.
//!
//! Builds a per-user installer from the finalized distribution tree using
//! NSIS (Nullsoft Scriptable Install System).
//!
//! # Module Organization
//!
//! - `template` - NSI script template constant
//! - `script` - NSI script generation from an [`InstallerSpec`]
//! - `build` - makensis execution
//! - `utils` - NSIS string escaping and BOM-prefixed writing

mod build;
mod script;
mod template;
mod utils;

pub use build::{MAKENSIS, makensis_command};
pub use script::render_nsi_script;

use crate::bundler::{
    error::{Context, Error, ErrorExt, Result},
    process::CommandRunner,
    settings::Settings,
    utils::fs::list_files,
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Everything the installer script is rendered from.
///
/// `files` is the complete manifest of the distribution tree as absolute
/// paths, so the installer copies the whole tree and nothing else.
#[derive(Debug, Clone)]
pub struct InstallerSpec {
    pub app_name: String,
    pub version: String,
    pub author: String,
    pub company_name: String,
    pub description: String,
    pub license: String,
    pub url: String,
    /// Absolute path of the installer icon, if one is configured.
    pub icon: Option<PathBuf>,
    /// Absolute root of the distribution tree.
    pub source_dir: PathBuf,
    /// Absolute paths of every regular file under `source_dir`, sorted.
    pub files: Vec<PathBuf>,
    /// Absolute path of the finalized executable inside `source_dir`.
    pub main_executable: PathBuf,
    pub run_at_startup: bool,
    pub output_path: PathBuf,
}

impl InstallerSpec {
    /// Collects the installer inputs from settings and the finalized tree.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let layout = settings.layout();
        let source_dir = absolute(&layout.distribution_dir())?;
        let main_executable = absolute(&layout.main_executable())?;

        if !tokio::fs::try_exists(&main_executable).await.unwrap_or(false) {
            return Err(Error::MissingCompilerOutput {
                path: main_executable,
            });
        }

        let files = list_files(&source_dir).await?;
        let icon = match settings.package().icon.as_str() {
            "" => None,
            icon => Some(absolute(Path::new(icon))?),
        };

        Ok(Self {
            app_name: settings.app_name().to_string(),
            version: settings.version_string().to_string(),
            author: settings.author().to_string(),
            company_name: settings.company_name().to_string(),
            description: settings.description().to_string(),
            license: settings.package().license.clone(),
            url: settings.package().url.clone(),
            icon,
            source_dir,
            files,
            main_executable,
            run_at_startup: settings.windows().run_at_startup,
            output_path: absolute(&layout.installer_path(settings.windows().installer_naming))?,
        })
    }

    /// Publisher shown in Add/Remove Programs: the author, else the company.
    pub fn publisher(&self) -> &str {
        if self.author.is_empty() {
            &self.company_name
        } else {
            &self.author
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .fs_context("resolving absolute path", path)
}

/// Bundle the finalized tree as an NSIS installer.
///
/// # Process
///
/// 1. Collect the file manifest of the distribution tree
/// 2. Render the NSI script into `{dist}/nsis/`
/// 3. Compile it with makensis
///
/// # Returns
///
/// Vector containing the path to the generated installer .exe file
pub async fn bundle_project<R: CommandRunner>(
    settings: &Settings,
    runner: &R,
) -> Result<Vec<PathBuf>> {
    log::info!("Building NSIS installer for {}", settings.app_name());

    let spec = InstallerSpec::from_settings(settings).await?;
    log::debug!(
        "Installer manifest: {} files from {}",
        spec.files.len(),
        spec.source_dir.display()
    );

    let nsi_path = absolute(&settings.layout().installer_script_path())?;
    script::generate_nsi_script(&spec, &nsi_path)
        .await
        .context("generating NSI script")?;

    build::run_makensis(runner, &nsi_path, &spec.output_path)
        .await
        .context("compiling NSIS installer")?;

    log::info!("✓ Created NSIS installer: {}", spec.output_path.display());

    Ok(vec![spec.output_path])
}

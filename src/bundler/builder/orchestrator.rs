//! Main bundler orchestration.
//!
//! [`Bundler`] drives one build through
//! `Start → Compiled → Finalized → Packaged → Archived → Done`, stopping at
//! the first failure.

use super::{
    ArtifactKind, BuildReport, BuildState, BuildStep, BundledArtifact,
    checksum::calculate_sha256,
};
use crate::{
    bail,
    bundler::{
        archive, compiler,
        error::{Error, ErrorExt, Result},
        finalize,
        platform::{self, Platform},
        process::{CommandRunner, SystemRunner},
        settings::Settings,
        utils::fs,
    },
};
use std::path::{Path, PathBuf};

/// Main bundler orchestrator.
///
/// Owns one validated [`Settings`], the target [`Platform`] and the
/// [`CommandRunner`] every external program goes through. A `Bundler`
/// performs a single build; create a new one to build again.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_installer::bundler::{Bundler, Platform, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_installer::bundler::Result<()> {
/// let mut bundler = Bundler::new(settings, Platform::current());
/// let report = bundler.bundle().await?;
///
/// for artifact in &report.artifacts {
///     println!("{}: {} ({} bytes)", artifact.kind, artifact.path.display(), artifact.size);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler<R = SystemRunner> {
    settings: Settings,
    platform: Platform,
    runner: R,
    state: BuildState,
}

impl Bundler<SystemRunner> {
    /// Creates a bundler that runs real processes, honouring the configured
    /// process timeout.
    pub fn new(settings: Settings, platform: Platform) -> Self {
        let runner = SystemRunner::with_timeout(settings.compiler().process_timeout);
        Self::with_runner(settings, platform, runner)
    }
}

impl<R: CommandRunner> Bundler<R> {
    /// Creates a bundler that runs external programs through `runner`.
    pub fn with_runner(settings: Settings, platform: Platform, runner: R) -> Self {
        Self {
            settings,
            platform,
            runner,
            state: BuildState::Start,
        }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Target platform.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Runner used for external programs.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Current pipeline state.
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Runs the whole pipeline.
    ///
    /// On failure the state becomes [`BuildState::Failed`] naming the step,
    /// the error is wrapped with that step, and no later step runs.
    /// Artifacts written before the failure are left in place.
    ///
    /// # Errors
    ///
    /// Returns an error if this bundler has already run, or if any step fails.
    pub async fn bundle(&mut self) -> Result<BuildReport> {
        if self.state != BuildState::Start {
            bail!("bundler already ran (state: {})", self.state);
        }

        log::info!(
            "Building {} {} for {}",
            self.settings.app_name(),
            self.settings.version_string(),
            self.platform
        );

        let outcome = self.preflight().await;
        self.advance(BuildStep::Preflight, outcome)?;

        let outcome = self.compile().await;
        self.advance(BuildStep::Compile, outcome)?;

        let outcome = finalize::finalize(&self.settings, &self.platform).await;
        let finalized = self.advance(BuildStep::Finalize, outcome)?;

        let outcome = platform::package(&self.settings, &self.platform, &self.runner).await;
        let packages = self.advance(BuildStep::Package, outcome)?;

        let outcome = archive::create_update_archive(&self.settings).await;
        let archive_path = self.advance(BuildStep::Archive, outcome)?;

        let outcome = self.report(finalized, packages, archive_path).await;
        self.advance(BuildStep::Report, outcome)
    }

    /// Records the outcome of `step` and moves the state machine.
    fn advance<T>(&mut self, step: BuildStep, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.state = step.completed_state();
                log::debug!("{} step complete, state: {}", step, self.state);
                Ok(value)
            }
            Err(error) => {
                self.state = BuildState::Failed { step };
                log::error!("{} step failed: {}", step, error);
                Err(Error::Context {
                    context: format!("{} step failed", step),
                    source: Box::new(error),
                })
            }
        }
    }

    /// Checks everything that can be checked before an external process runs.
    async fn preflight(&self) -> Result<()> {
        if let Platform::Unsupported(os) = &self.platform {
            return Err(Error::UnsupportedPlatform(os.clone()));
        }

        if self.platform == Platform::Darwin && self.settings.compiler().console {
            return Err(Error::InvalidConfig(
                "console builds produce no application bundle and cannot be packaged for macOS; \
                 set compiler.console = false"
                    .into(),
            ));
        }

        fs::create_dir_all(self.settings.dist_path(), false).await
    }

    async fn compile(&self) -> Result<()> {
        if !self.settings.compiler().skip_compile {
            return compiler::compile(&self.settings, &self.runner).await;
        }

        let tree = self.settings.layout().distribution_dir();
        log::info!("Skipping compilation, reusing {}", tree.display());
        if !tokio::fs::try_exists(&tree)
            .await
            .fs_context("checking distribution tree", &tree)?
        {
            return Err(Error::MissingCompilerOutput { path: tree });
        }
        Ok(())
    }

    async fn report(
        &self,
        finalized: PathBuf,
        packages: Vec<PathBuf>,
        archive: PathBuf,
    ) -> Result<BuildReport> {
        // The bundle moved into the tree while packaging.
        let (package_kind, finalized) = match self.platform {
            Platform::Darwin => (
                ArtifactKind::DiskImage,
                self.settings.layout().relocated_app_bundle(),
            ),
            _ => (ArtifactKind::Installer, finalized),
        };

        let mut artifacts = Vec::with_capacity(packages.len() + 1);
        for path in packages {
            artifacts.push(describe(package_kind, path).await?);
        }
        artifacts.push(describe(ArtifactKind::UpdateArchive, archive).await?);

        Ok(BuildReport {
            app_name: self.settings.app_name().to_string(),
            version: self.settings.version_string().to_string(),
            platform: self.platform.to_string(),
            state: BuildState::Done,
            finalized,
            artifacts,
        })
    }
}

/// Measures and hashes one artifact.
async fn describe(kind: ArtifactKind, path: PathBuf) -> Result<BundledArtifact> {
    let size = artifact_size(&path).await?;
    let checksum = calculate_sha256(&path).await?;
    log::debug!("{} {} sha256={}", kind, path.display(), checksum);

    Ok(BundledArtifact {
        kind,
        path,
        size,
        checksum,
    })
}

async fn artifact_size(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;
    Ok(metadata.len())
}

//! Command line interface for the installer build pipeline.
//!
//! Parses arguments, loads the build file, runs the [`Bundler`] and reports
//! the produced artifacts.

mod args;
mod output;

pub use args::{Args, DEFAULT_CONFIG, RuntimeConfig};
pub use output::OutputManager;

use crate::{
    bundler::{BuildReport, Bundler, Platform},
    error::{BundlerError, CliError, EXIT_SUCCESS, Result},
    metadata::{BuildOverrides, load_settings},
};

/// Main CLI entry point
pub async fn run(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let config = RuntimeConfig::from(&args);
    execute(&args, &config).await
}

/// Runs the build described by `args`.
pub async fn execute(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let overrides = BuildOverrides {
        dist_path: args.dist_path.clone(),
        version: args.app_version.clone(),
        skip_compile: args.skip_compile,
        process_timeout: args.process_timeout(),
    };

    config.verbose_println(&format!("Loading {}", args.config.display()))?;
    let settings = load_settings(&args.config, &overrides)?;
    let platform = args.target_platform();

    config.section(&format!(
        "{} {} ({})",
        settings.app_name(),
        settings.version_string(),
        platform
    ))?;
    config.progress(&format!(
        "Building into {}",
        settings.dist_path().display()
    ))?;
    if platform.is_supported() && platform != Platform::current() {
        config.warn(&format!(
            "packaging for {} on a {} host; the external tools must still be on PATH",
            platform,
            std::env::consts::OS
        ))?;
    }
    if settings.compiler().skip_compile {
        config.warn(&format!(
            "reusing existing distribution tree {}",
            settings.layout().distribution_dir().display()
        ))?;
    }

    let mut bundler = Bundler::new(settings, platform);
    let report = bundler.bundle().await?;

    print_report(&report, config)?;
    Ok(EXIT_SUCCESS)
}

fn print_report(report: &BuildReport, config: &RuntimeConfig) -> Result<()> {
    if config.json() {
        let json = serde_json::to_string_pretty(report)?;
        println!("{}", json);
        return Ok(());
    }

    config.success(&format!(
        "Built {} artifact(s) for {} {}",
        report.artifacts.len(),
        report.app_name,
        report.version
    ))?;
    for artifact in &report.artifacts {
        config.indent(&format!(
            "{}: {} ({} bytes)",
            artifact.kind,
            artifact.path.display(),
            artifact.size
        ))?;
        config.verbose_println(&format!("sha256 {}", artifact.checksum))?;
    }
    Ok(())
}

/// Prints `error` with recovery suggestions.
pub fn report_error(error: &BundlerError, output: &OutputManager) {
    if output.error(&error.to_string()).is_err() {
        eprintln!("error: {}", error);
    }
    for suggestion in error.recovery_suggestions() {
        // Suggestions are best-effort; a broken stderr has already failed above.
        let _ = output.indent(&suggestion);
    }
}

//! Ahead-of-time compilation step.
//!
//! - `command` - argument synthesis from [`Settings`]
//! - `version` - four-component version padding

mod command;
mod version;

pub use command::CompilerCommand;
pub use version::{WINDOWS_VERSION_COMPONENTS, pad_version};

use crate::bundler::{
    error::Result,
    process::{CommandRunner, run_checked},
    settings::Settings,
};

/// Runs the compiler and waits for it to finish.
///
/// Any non-zero exit or launch failure is fatal; nothing is retried.
pub async fn compile<R: CommandRunner>(settings: &Settings, runner: &R) -> Result<()> {
    let command = CompilerCommand::from_settings(settings);

    log::info!(
        "Compiling {} into {}",
        settings.compiler().main_module,
        settings.layout().distribution_dir().display()
    );

    run_checked(runner, &command.to_process_command()).await?;

    Ok(())
}

//! NSIS installer build execution.
//!
//! Compiles NSI scripts into Windows installer executables using makensis.

use crate::{
    bail,
    bundler::{
        error::{ErrorExt, Result},
        process::{CommandRunner, ProcessCommand, run_checked},
    },
};
use std::path::Path;

/// Program name of the NSIS compiler.
pub const MAKENSIS: &str = "makensis";

/// makensis invocation for `nsi_path`, writing the installer to `output_path`.
///
/// The output path is passed as the `OUTPUT_FILE` define the template's
/// `OutFile` reads.
pub fn makensis_command(nsi_path: &Path, output_path: &Path) -> ProcessCommand {
    ProcessCommand::new(MAKENSIS)
        .args(["-V3", "-INPUTCHARSET", "UTF8", "-OUTPUTCHARSET", "UTF8"])
        .arg(format!("-DOUTPUT_FILE={}", output_path.display()))
        .arg(nsi_path.display().to_string())
}

/// Run makensis to compile the NSI script into an installer executable.
///
/// Fails if makensis exits non-zero or exits cleanly without writing the
/// installer.
pub async fn run_makensis<R: CommandRunner>(
    runner: &R,
    nsi_path: &Path,
    output_path: &Path,
) -> Result<()> {
    log::info!("Running makensis...");

    if let Some(parent) = output_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating installer output directory", parent)?;
    }

    let command = makensis_command(nsi_path, output_path);
    run_checked(runner, &command).await?;

    if !tokio::fs::try_exists(output_path).await.unwrap_or(false) {
        bail!(
            "makensis finished but no installer was written to {}",
            output_path.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_defines_output_file() {
        let command = makensis_command(Path::new("dist/nsis/Foo.nsi"), Path::new("dist/Foo-1.2-setup.exe"));
        assert_eq!(command.program(), "makensis");
        assert_eq!(
            command.get_args(),
            [
                "-V3",
                "-INPUTCHARSET",
                "UTF8",
                "-OUTPUTCHARSET",
                "UTF8",
                "-DOUTPUT_FILE=dist/Foo-1.2-setup.exe",
                "dist/nsis/Foo.nsi",
            ]
        );
    }
}

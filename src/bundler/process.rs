//! External process execution.
//!
//! Every external program the pipeline runs (the compiler, `makensis`,
//! `hdiutil`) goes through [`CommandRunner`], so tests can substitute a
//! recording fake for [`SystemRunner`].

use crate::bundler::error::{Error, Result};
use std::{
    fmt,
    future::Future,
    io,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// A program plus its argument vector.
///
/// Arguments are handed to the OS as-is; no shell is involved, so values
/// containing spaces need no quoting. [`Display`](fmt::Display) renders a
/// shell-quoted form for logs and error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl ProcessCommand {
    /// Creates a command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments in order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Runs the program from `dir` instead of the current directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument vector, excluding the program.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Working directory override.
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Quotes a token for display when it contains whitespace or shell metacharacters.
pub fn shell_quote(token: &str) -> String {
    if token.is_empty() {
        return "''".to_string();
    }

    let needs_quoting = token.chars().any(|c| {
        c.is_whitespace() || matches!(c, '\'' | '"' | '$' | '`' | '\\' | '&' | '|' | ';' | '<' | '>' | '(' | ')' | '*' | '?')
    });

    if needs_quoting {
        format!("'{}'", token.replace('\'', r"'\''"))
    } else {
        token.to_string()
    }
}

/// Exit status and captured output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// True when the process exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external command to completion and reports how it exited.
///
/// Implementations return `Err` only when the program could not be run at
/// all (not found, spawn failure, timeout). A non-zero exit is reported in
/// [`ProcessOutput::code`]; use [`run_checked`] to treat it as an error.
pub trait CommandRunner {
    /// Runs `command`, blocking the pipeline until it exits.
    fn run(&self, command: &ProcessCommand) -> impl Future<Output = Result<ProcessOutput>> + Send;
}

/// Runs `command` and turns a non-zero exit into [`Error::CommandExited`].
pub async fn run_checked<R: CommandRunner>(
    runner: &R,
    command: &ProcessCommand,
) -> Result<ProcessOutput> {
    log::debug!("$ {}", command);

    let output = runner.run(command).await?;
    if !output.success() {
        return Err(Error::CommandExited {
            command: command.to_string(),
            code: output.code,
            stderr: output.stderr,
        });
    }

    Ok(output)
}

/// Runs commands as real child processes.
///
/// Programs are resolved on `PATH` before spawning. Output is streamed to
/// the debug log line by line and captured for error reporting.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Creates a runner that waits indefinitely for each process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner that kills processes running longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Configured timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
        let rendered = command.to_string();

        let program = which::which(command.program()).map_err(|e| Error::CommandFailed {
            command: rendered.clone(),
            error: io::Error::new(
                io::ErrorKind::NotFound,
                format!("`{}` not found in PATH: {}", command.program(), e),
            ),
        })?;

        let mut cmd = tokio::process::Command::new(&program);
        cmd.args(command.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = command.get_current_dir() {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|error| Error::CommandFailed {
            command: rendered.clone(),
            error,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both streams must be drained before waiting, or a chatty tool can
        // block on a full pipe.
        let finished = {
            let run = async {
                let (stdout, stderr) =
                    tokio::join!(collect_lines(stdout, "stdout"), collect_lines(stderr, "stderr"));
                let status = child.wait().await;
                (stdout, stderr, status)
            };

            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, run).await.ok(),
                None => Some(run.await),
            }
        };

        let Some((stdout, stderr, status)) = finished else {
            let after = self.timeout.unwrap_or_default();
            log::warn!(
                "{} exceeded {}s, terminating",
                command.program(),
                after.as_secs()
            );
            if let Err(e) = child.kill().await {
                log::warn!("Failed to kill {}: {}", command.program(), e);
            }
            return Err(Error::Timeout {
                command: rendered,
                after,
            });
        };

        let status = status.map_err(|error| Error::CommandFailed {
            command: rendered,
            error,
        })?;

        Ok(ProcessOutput {
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

/// Reads a child stream to the end, logging each line.
///
/// Lines are decoded lossily; a tool printing in a non-UTF-8 code page is
/// still drained to EOF.
async fn collect_lines<R: AsyncRead + Unpin>(stream: Option<R>, label: &str) -> String {
    let Some(stream) = stream else {
        return String::new();
    };

    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    let mut captured = String::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                log::debug!("[{}] {}", label, line);
                captured.push_str(line);
                captured.push('\n');
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", label, e);
                break;
            }
        }
    }
    captured
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_tokens_with_spaces() {
        let command = ProcessCommand::new("python3")
            .args(["-m", "nuitka"])
            .arg("--windows-company-name=Example Inc.")
            .arg("it's");
        assert_eq!(
            command.to_string(),
            r#"python3 -m nuitka '--windows-company-name=Example Inc.' 'it'\''s'"#
        );
    }

    #[test]
    fn empty_token_is_visible() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("plain"), "plain");
    }

    #[test]
    fn output_success_requires_zero() {
        assert!(ProcessOutput { code: Some(0), ..Default::default() }.success());
        assert!(!ProcessOutput { code: Some(2), ..Default::default() }.success());
        assert!(!ProcessOutput { code: None, ..Default::default() }.success());
    }

    struct ExitWith(Option<i32>);

    impl CommandRunner for ExitWith {
        async fn run(&self, _command: &ProcessCommand) -> Result<ProcessOutput> {
            Ok(ProcessOutput {
                code: self.0,
                stdout: String::new(),
                stderr: "boom\n".into(),
            })
        }
    }

    #[tokio::test]
    async fn run_checked_rejects_non_zero_exit() {
        let command = ProcessCommand::new("hdiutil").arg("create");
        let err = run_checked(&ExitWith(Some(1)), &command).await.unwrap_err();
        match err {
            Error::CommandExited { command, code, stderr } => {
                assert_eq!(command, "hdiutil create");
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(run_checked(&ExitWith(Some(0)), &command).await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_captures_output_and_status() {
        let runner = SystemRunner::new();
        let output = runner
            .run(&ProcessCommand::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]))
            .await
            .unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_drains_non_utf8_output() {
        let runner = SystemRunner::new();
        let output = runner
            .run(&ProcessCommand::new("sh").args([
                "-c",
                "printf '\\377\\n'; head -c 300000 /dev/zero | tr '\\0' a; echo; exit 0",
            ]))
            .await
            .unwrap();
        assert_eq!(output.code, Some(0));

        let mut lines = output.stdout.lines();
        assert_eq!(lines.next(), Some("\u{FFFD}"));
        assert_eq!(lines.next().map(str::len), Some(300_000));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_enforces_timeout() {
        let runner = SystemRunner::with_timeout(Some(Duration::from_millis(200)));
        let err = runner
            .run(&ProcessCommand::new("sh").args(["-c", "sleep 5"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[tokio::test]
    async fn missing_program_is_launch_failure() {
        let err = SystemRunner::new()
            .run(&ProcessCommand::new("definitely-not-a-real-tool-4711"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
        assert!(err.to_string().contains("not found in PATH"));
    }
}

//! Colored terminal output.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, IsTerminal, Write};

/// Writes user-facing progress lines to stderr, keeping stdout free for
/// the build report.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    color: ColorChoice,
}

impl OutputManager {
    /// Creates an output manager. `quiet` suppresses everything except errors.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let color = if io::stderr().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };

        Self {
            verbose,
            quiet,
            color,
        }
    }

    fn write_line(&self, prefix: &str, color: Option<Color>, bold: bool, message: &str) -> io::Result<()> {
        let mut stream = StandardStream::stderr(self.color);
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);

        stream.set_color(&spec)?;
        write!(stream, "{}", prefix)?;
        stream.reset()?;
        writeln!(stream, "{}", message)
    }

    /// Print message only in verbose mode
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose && !self.quiet {
            self.write_line("  · ", Some(Color::Cyan), false, message)?;
        }
        Ok(())
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line("→ ", Some(Color::Blue), true, message)
    }

    /// Print success message
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line("✓ ", Some(Color::Green), true, message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line("warning: ", Some(Color::Yellow), true, message)
    }

    /// Print error message; shown even in quiet mode
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write_line("error: ", Some(Color::Red), true, message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line("", None, true, title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line("    ", None, false, message)
    }
}

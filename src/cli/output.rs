//! Colored terminal output for stage narration.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes operator-facing messages to stdout (and stderr for problems).
///
/// `quiet` suppresses narration but never errors or the final status;
/// `verbose` enables [`OutputManager::verbose`] lines.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    fn stdout() -> StandardStream {
        let choice = if io::stdout().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        StandardStream::stdout(choice)
    }

    fn stderr() -> StandardStream {
        let choice = if io::stderr().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        StandardStream::stderr(choice)
    }

    fn colored(
        mut stream: StandardStream,
        color: Color,
        bold: bool,
        prefix: &str,
        message: &str,
    ) -> io::Result<()> {
        stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold))?;
        write!(stream, "{prefix}")?;
        stream.reset()?;
        writeln!(stream, "{message}")
    }

    /// Stage header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = Self::stdout();
        writeln!(stdout)?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        writeln!(stdout, "==> {title}")?;
        stdout.reset()
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::colored(Self::stdout(), Color::Cyan, false, "  - ", message)
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::colored(Self::stdout(), Color::Green, false, "  ✓ ", message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::colored(Self::stderr(), Color::Yellow, true, "  ! ", message)
    }

    /// Always printed.
    pub fn error(&self, message: &str) -> io::Result<()> {
        Self::colored(Self::stderr(), Color::Red, true, "  ✗ ", message)
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(Self::stdout(), "    {message}")
    }

    /// Indented detail on stderr, always printed (failure context).
    pub fn detail(&self, message: &str) -> io::Result<()> {
        writeln!(Self::stderr(), "    {message}")
    }

    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        Self::colored(Self::stdout(), Color::White, false, "    ", message)
    }

    /// Final status line, always printed.
    pub fn status(&self, label: &str, color: Color, message: &str) -> io::Result<()> {
        let mut stdout = Self::stdout();
        writeln!(stdout)?;
        stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stdout, "{label}")?;
        stdout.reset()?;
        writeln!(stdout, ": {message}")
    }
}

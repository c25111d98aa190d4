//! User-facing terminal output.

use std::io::{self, Write};

/// Prints progress and summaries, gating detail behind `--verbose`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputManager {
    verbose: bool,
}

impl OutputManager {
    /// Creates an output manager; `verbose` enables [`OutputManager::verbose`] lines.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an indented progress line, only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose {
            writeln!(io::stdout().lock(), " {}", message)?;
        }
        Ok(())
    }

    /// Print a section header preceded by a blank line.
    pub fn section(&self, title: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "\n{}", title)
    }

    /// Print a message unconditionally.
    pub fn info(&self, message: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{}", message)
    }
}

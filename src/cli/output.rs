//! Terminal output for pipeline progress.
//!
//! Everything goes to standard output so CI logs keep one ordered stream.

use std::io::{self, Write};

/// Writes progress, warnings and errors to stdout.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    ///
    /// `quiet` suppresses everything except errors; `verbose` enables
    /// per-file detail.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    fn emit(&self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)
    }

    /// Detail line, only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose && !self.quiet {
            self.emit(message)?;
        }
        Ok(())
    }

    /// Step in progress.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.emit(&format!("→ {}", message))
    }

    /// Completed step.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.emit(&format!("✓ {}", message))
    }

    /// Recoverable problem.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.emit(&format!("⚠ {}", message))
    }

    /// Failure; printed even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.emit(&format!("✗ {}", message))
    }

    /// Section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.emit(&format!("\n== {} ==", title))
    }

    /// Indented line under the current section.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.emit(&format!("  {}", message))
    }
}

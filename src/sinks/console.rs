//! Colored stdout stream

use crate::core::Severity;
use std::io::Write;

/// Writes emission lines to stdout with a severity-specific color.
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        // Escape sequences go out even when stdout is not a terminal, so
        // piped output keeps the severity coloring.
        colored::control::set_override(true);
        Self
    }

    /// Write one line, whole, under the stdout lock. Failures on stdout are
    /// ignored; the file sinks are the durable path.
    pub fn write(&self, severity: Severity, line: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}", severity.paint(line));
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

//! Per-severity append-only file sinks

use crate::core::{LoggerError, Result, Severity};
use crate::sinks::ConsoleSink;
use parking_lot::Mutex;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Marker written to every sink file when it is opened.
pub const SESSION_BANNER: &str = "\n\n-------------Starting new Session---------------\n\n";

/// One append-only severity file.
///
/// Every consumer writes every sink, so each sink carries its own lock;
/// lines are appended whole under it.
pub struct SeveritySink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl SeveritySink {
    /// Open (or create) the file in append mode and write the session
    /// banner.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LoggerError::sink_open(&path, source))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(SESSION_BANNER.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|source| LoggerError::sink_open(&path, source))?;

        Ok(Self {
            path,
            writer: Mutex::new(writer),
        })
    }

    pub fn append(&self, line: &str) -> Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SeveritySink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}

/// The full output side of one logger session: six severity files plus the
/// optional colored stdout stream.
pub struct SinkSet {
    sinks: [Option<SeveritySink>; Severity::COUNT],
    console: Option<ConsoleSink>,
}

impl SinkSet {
    /// Resolve the base directory, create `{base}/logs/`, and open every
    /// severity file.
    ///
    /// A severity file that cannot be opened is reported to stderr and its
    /// slot stays empty; lines for that severity are then dropped. Only a
    /// failure to create the logs directory itself is an error.
    pub fn open(directory: &str, stdout_enabled: bool) -> Result<Self> {
        let dir = resolve_base_dir(directory).join("logs");
        fs::create_dir_all(&dir).map_err(|source| LoggerError::sink_open(&dir, source))?;

        let sinks = Severity::ALL.map(|severity| {
            let path = dir.join(format!("{}.log", severity.as_str()));
            match SeveritySink::open(path) {
                Ok(sink) => Some(sink),
                Err(err) => {
                    eprintln!("[LOGGER ERROR] {}", err);
                    None
                }
            }
        });

        Ok(Self {
            sinks,
            console: stdout_enabled.then(ConsoleSink::new),
        })
    }

    /// Append a finished line to the severity's file and, when enabled, to
    /// the colored stdout stream.
    pub fn append(&self, severity: Severity, line: &str) -> Result<()> {
        if let Some(sink) = &self.sinks[severity.index()] {
            sink.append(line)?;
        }
        if let Some(console) = &self.console {
            console.write(severity, line);
        }
        Ok(())
    }

    pub fn flush(&self) {
        for sink in self.sinks.iter().flatten() {
            if let Err(err) = sink.flush() {
                eprintln!("[LOGGER ERROR] failed to flush {}: {}", sink.path().display(), err);
            }
        }
    }

    pub fn sink_path(&self, severity: Severity) -> Option<&Path> {
        self.sinks[severity.index()].as_ref().map(SeveritySink::path)
    }
}

/// Pick the directory the `logs/` tree lives under: the requested path when
/// it names an existing directory, the current working directory otherwise.
pub(crate) fn resolve_base_dir(requested: &str) -> PathBuf {
    let path = Path::new(requested);
    if path.is_dir() {
        path.to_path_buf()
    } else {
        env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

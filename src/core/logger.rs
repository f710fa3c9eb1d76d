//! Logger lifecycle and emission

use super::consumer::{self, ShardTable};
use super::error::{LoggerError, Result};
use super::metrics::LoggerMetrics;
use super::record::{ArgList, Record};
use super::severity::Severity;
use crate::sinks::SinkSet;
use crossbeam_utils::Backoff;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Configuration for [`Logger::initialize`].
///
/// # Example
/// ```
/// use quick_logger_system::LoggerConfig;
///
/// let config = LoggerConfig::new()
///     .with_directory("/var/tmp")
///     .with_shard_count(4)
///     .with_stdout(true);
/// assert_eq!(config.shard_count, 4);
/// ```
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Base directory for the `logs/` tree. An empty or non-directory path
    /// falls back to the current working directory.
    pub directory: String,
    /// Number of shards (and consumer threads). `0` picks the host's
    /// hardware concurrency.
    pub shard_count: usize,
    /// Mirror every line to stdout with severity coloring.
    pub stdout_enabled: bool,
    /// Best-effort CPU pinning of consumer threads. Ignored when the shard
    /// count exceeds the hardware concurrency.
    pub pin_consumers: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            directory: String::new(),
            shard_count: 0,
            stdout_enabled: false,
            pin_consumers: false,
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    #[must_use]
    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    #[must_use]
    pub fn with_stdout(mut self, enabled: bool) -> Self {
        self.stdout_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_pinned_consumers(mut self, enabled: bool) -> Self {
        self.pin_consumers = enabled;
        self
    }
}

/// Everything that exists between `initialize` and `stop`.
struct Active {
    shard_count: usize,
    shards: Arc<ShardTable>,
    terminate: Arc<Vec<AtomicBool>>,
    consumers: Vec<JoinHandle<()>>,
    sinks: Arc<SinkSet>,
    metrics: Arc<LoggerMetrics>,
    pin_consumers: bool,
    running: bool,
}

/// Sharded multi-producer / multi-consumer logger.
///
/// Lifecycle: fresh → initialized ([`Logger::initialize`]) → running
/// ([`Logger::start`]) → fresh again ([`Logger::stop`]). `initialize` and
/// `start` are idempotent while the logger is active; `stop` drains every
/// shard before releasing the sinks, so every accepted emission reaches its
/// file.
///
/// Producers pass an explicit shard index; the logger does no implicit
/// routing. Callers must not emit concurrently with `stop`.
///
/// # Example
/// ```no_run
/// use quick_logger_system::prelude::*;
///
/// let logger = Logger::new();
/// let config = LoggerConfig::new().with_shard_count(2);
/// let _shards = logger.initialize(&config)?;
/// logger.start()?;
/// logger.emit(Severity::Info, 0, "service started");
/// logger.emit_with(Severity::Error, 1, "request {} failed: {}", (41, "timeout"));
/// logger.stop();
/// # Ok::<(), LoggerError>(())
/// ```
pub struct Logger {
    inner: RwLock<Option<Active>>,
}

impl Logger {
    /// A fresh logger. `const`, so it can back a `static` handle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Open the sinks and allocate the shard machinery.
    ///
    /// Returns the shard count actually chosen (`config.shard_count`, or the
    /// hardware concurrency when that is `0`). Calling this on an active
    /// logger is a no-op that returns the active count.
    ///
    /// A severity file that cannot be opened is reported to stderr and that
    /// severity's lines are dropped; only a failure to create the logs
    /// directory is an error.
    pub fn initialize(&self, config: &LoggerConfig) -> Result<usize> {
        let mut inner = self.inner.write();
        if let Some(active) = inner.as_ref() {
            eprintln!(
                "[LOGGER WARNING] initialize called on an active logger; keeping {} shards",
                active.shard_count
            );
            return Ok(active.shard_count);
        }

        let shard_count = if config.shard_count == 0 {
            hardware_concurrency()
        } else {
            config.shard_count
        };
        let sinks = Arc::new(SinkSet::open(&config.directory, config.stdout_enabled)?);
        let terminate = Arc::new(
            (0..shard_count)
                .map(|_| AtomicBool::new(false))
                .collect::<Vec<_>>(),
        );

        *inner = Some(Active {
            shard_count,
            shards: Arc::new(ShardTable::new(shard_count)),
            terminate,
            consumers: Vec::new(),
            sinks,
            metrics: Arc::new(LoggerMetrics::new()),
            pin_consumers: config.pin_consumers,
            running: false,
        });
        Ok(shard_count)
    }

    /// Spawn one consumer per shard.
    ///
    /// Returns once every consumer has published its queue, so an emit to
    /// any shard index below the shard count is valid immediately after.
    /// Calling this on a running logger is a no-op.
    pub fn start(&self) -> Result<()> {
        let mut inner = self.inner.write();
        let active = inner.as_mut().ok_or(LoggerError::NotInitialized)?;
        if active.running {
            eprintln!("[LOGGER WARNING] start called on a running logger");
            return Ok(());
        }

        let pin = active.pin_consumers && active.shard_count <= hardware_concurrency();
        for shard_id in 0..active.shard_count {
            let handle = consumer::spawn(
                shard_id,
                Arc::clone(&active.shards),
                Arc::clone(&active.terminate),
                Arc::clone(&active.sinks),
                Arc::clone(&active.metrics),
                pin.then_some(shard_id),
            )
            .map_err(|source| LoggerError::consumer_spawn(shard_id, source))?;
            active.consumers.push(handle);
        }

        // Handoff barrier: wait until every consumer has published its
        // queue.
        let backoff = Backoff::new();
        while !active.shards.all_published() {
            backoff.snooze();
        }
        active.running = true;
        Ok(())
    }

    /// Enqueue a ready-rendered record onto `shard`.
    ///
    /// Returns `false`, with no side effects, when the shard index is out of
    /// range or the logger is not running. Never blocks beyond allocation
    /// and the lock-free push.
    pub fn emit(&self, severity: Severity, shard: usize, text: impl Into<String>) -> bool {
        self.enqueue(shard, || Record::ready(severity, text))
    }

    /// Enqueue a record whose formatting is deferred to the consumer.
    ///
    /// `args` is a tuple of up to eight `Display` values captured by value;
    /// the consumer substitutes them into the `{}` placeholders of
    /// `template`. An empty tuple degenerates to a ready record.
    pub fn emit_with<A>(
        &self,
        severity: Severity,
        shard: usize,
        template: impl Into<String>,
        args: A,
    ) -> bool
    where
        A: ArgList + 'static,
    {
        self.enqueue(shard, || {
            if args.count() == 0 {
                Record::ready(severity, template)
            } else {
                Record::deferred(severity, template, args)
            }
        })
    }

    fn enqueue(&self, shard: usize, build: impl FnOnce() -> Record) -> bool {
        let inner = self.inner.read();
        let Some(active) = inner.as_ref() else {
            return false;
        };
        let queue = if shard < active.shard_count {
            active.shards.get(shard)
        } else {
            None
        };
        match queue {
            Some(queue) => {
                queue.push(build());
                active.metrics.record_emitted();
                true
            }
            None => {
                active.metrics.record_rejected();
                false
            }
        }
    }

    /// Drain every shard, join every consumer, close every sink, and return
    /// the logger to its fresh state.
    ///
    /// Every record accepted before this call reaches its sink file. Waits
    /// indefinitely for the consumers to finish draining.
    pub fn stop(&self) {
        let mut inner = self.inner.write();
        let Some(mut active) = inner.take() else {
            eprintln!("[LOGGER WARNING] stop called on an idle logger");
            return;
        };

        for flag in active.terminate.iter() {
            flag.store(true, Ordering::Release);
        }
        for handle in active.consumers.drain(..) {
            if let Err(panic) = handle.join() {
                eprintln!(
                    "[LOGGER ERROR] consumer thread panicked during shutdown: {:?}",
                    panic
                );
            }
        }
        active.sinks.flush();
        // Dropping `active` closes the sink files; the logger is
        // reinitializable from here.
    }

    /// Shard count of the active session, `None` when fresh.
    pub fn shard_count(&self) -> Option<usize> {
        self.inner.read().as_ref().map(|active| active.shard_count)
    }

    pub fn is_running(&self) -> bool {
        self.inner.read().as_ref().is_some_and(|active| active.running)
    }

    /// Snapshot of the active session's counters; zeros when fresh.
    pub fn metrics(&self) -> LoggerMetrics {
        self.inner
            .read()
            .as_ref()
            .map(|active| (*active.metrics).clone())
            .unwrap_or_default()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // A dropped handle must not leave consumer threads spinning.
        if self.inner.get_mut().is_some() {
            self.stop();
        }
    }
}

fn hardware_concurrency() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

static GLOBAL: Logger = Logger::new();

/// The process-wide logger handle.
///
/// The explicit [`Logger`] API is the core; this handle is the convenience
/// layer for programs that want a single well-known logger.
pub fn global() -> &'static Logger {
    &GLOBAL
}

/// Initialize and start the process-wide logger in one call.
///
/// Returns the handle together with the shard count actually chosen, which
/// is the upper bound for the shard index producers may pass.
///
/// # Example
/// ```no_run
/// use quick_logger_system::prelude::*;
///
/// let (logger, shards) = start_logger(&LoggerConfig::new().with_stdout(true))?;
/// logger.emit(Severity::Info, shards - 1, "up");
/// stop_logger(logger);
/// # Ok::<(), LoggerError>(())
/// ```
pub fn start_logger(config: &LoggerConfig) -> Result<(&'static Logger, usize)> {
    let logger = global();
    let shard_count = logger.initialize(config)?;
    logger.start()?;
    Ok((logger, shard_count))
}

/// Stop a logger started with [`start_logger`].
pub fn stop_logger(logger: &Logger) {
    logger.stop();
}

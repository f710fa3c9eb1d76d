//! # Quick Logger System
//!
//! A low-latency, sharded multi-producer / multi-consumer logging library
//! for throughput-sensitive applications.
//!
//! ## Features
//!
//! - **Cheap hot path**: producers pay allocation, a by-value argument
//!   capture, and one lock-free enqueue; string formatting runs on the
//!   consumer
//! - **Sharded**: one lock-free unbounded queue and one consumer thread per
//!   shard, selected explicitly by the producer
//! - **Per-severity files**: six append-only sinks (`ERROR.log` through
//!   `TRACE.log`) plus an optional colored stdout stream
//! - **Clean shutdown**: stop drains every accepted record before the sinks
//!   close, and the logger can be initialized again afterwards
//!
//! ## Quick start
//!
//! ```no_run
//! use quick_logger_system::prelude::*;
//! use quick_logger_system::info;
//!
//! let (logger, shards) = start_logger(&LoggerConfig::new().with_shard_count(2))?;
//! info!(logger, 0, "hello from shard {} of {}", 0, shards);
//! stop_logger(logger);
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        global, start_logger, stop_logger, ArgList, Logger, LoggerConfig, LoggerError,
        LoggerMetrics, Record, Result, Severity, ShardQueue,
    };
    pub use crate::sinks::{ConsoleSink, SeveritySink, SinkSet, SESSION_BANNER};
}

pub use crate::core::{
    global, start_logger, stop_logger, ArgList, Logger, LoggerConfig, LoggerError, LoggerMetrics,
    Record, Result, Severity, ShardQueue,
};
pub use crate::sinks::{ConsoleSink, SeveritySink, SinkSet, SESSION_BANNER};

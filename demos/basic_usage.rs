//! Basic usage demo
//!
//! Starts the process-wide logger, emits across two shards, and shuts down.
//!
//! Run with: cargo run --example basic_usage

use quick_logger_system::prelude::*;
use quick_logger_system::{error, info, warn};

fn main() -> Result<()> {
    let config = LoggerConfig::new().with_shard_count(2).with_stdout(true);
    let (logger, shards) = start_logger(&config)?;
    println!("logger running with {} shards", shards);

    info!(logger, 0, "Application started");
    info!(logger, 0, "Loading configuration...");
    warn!(logger, 0, "Using default settings for some options");
    error!(logger, 1, "Failed to load optional plugin: {}", "plugin.so");

    for i in 1..=5usize {
        info!(logger, i % shards, "Processing item {}/5", i);
    }

    stop_logger(logger);
    println!("check ./logs/ for the per-severity output files");
    Ok(())
}

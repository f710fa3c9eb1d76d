//! Deferred formatting demo
//!
//! Shows that producer-side emit latency does not depend on how expensive
//! the captured arguments are to stringify: the consumer renders them.
//!
//! Run with: cargo run --release --example deferred_formatting

use quick_logger_system::prelude::*;
use std::fmt;
use std::time::Instant;

/// Takes visible time to Display.
struct SlowReport(u64);

impl fmt::Display for SlowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut acc = self.0;
        for i in 0..5_000_000u64 {
            acc = acc.wrapping_mul(6364136223846793005).wrapping_add(i);
        }
        write!(f, "report#{}", acc)
    }
}

fn main() -> Result<()> {
    let logger = Logger::new();
    let config = LoggerConfig::new().with_shard_count(1);
    logger.initialize(&config)?;
    logger.start()?;

    const EMITS: u32 = 100;

    let start = Instant::now();
    for i in 0..EMITS {
        logger.emit_with(
            Severity::Info,
            0,
            "slow argument {}: {}",
            (i, SlowReport(u64::from(i))),
        );
    }
    let emit_elapsed = start.elapsed();
    println!(
        "{} emits with an expensive argument took {:?} ({:?} per emit)",
        EMITS,
        emit_elapsed,
        emit_elapsed / EMITS
    );

    let start = Instant::now();
    logger.stop();
    println!("drain + render + write took {:?}", start.elapsed());
    println!("the producer never paid for SlowReport::fmt");
    Ok(())
}

//! Stress tests for high-volume, multi-producer logging
//!
//! These tests verify:
//! - Durability under a million-record flood on one shard
//! - Per-shard FIFO under concurrent producers
//! - All six sinks under a cycling severity load

use quick_logger_system::prelude::*;
use std::fs;
use std::thread;
use tempfile::TempDir;

fn config(tmp: &TempDir, shards: usize) -> LoggerConfig {
    LoggerConfig::new()
        .with_directory(tmp.path().to_str().unwrap())
        .with_shard_count(shards)
}

fn read_sink(tmp: &TempDir, severity: Severity) -> String {
    let path = tmp
        .path()
        .join("logs")
        .join(format!("{}.log", severity.as_str()));
    fs::read_to_string(path).expect("Failed to read sink file")
}

fn entry_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !line.is_empty() && !line.contains("Starting new Session"))
        .collect()
}

fn text_field(line: &str) -> &str {
    line.splitn(4, '\t').nth(3).expect("malformed emission line")
}

#[test]
fn test_one_million_records_single_shard() {
    const TOTAL: u64 = 1_000_000;

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::new();
    logger.initialize(&config(&tmp, 1)).expect("initialize");
    logger.start().expect("start");

    for i in 0..TOTAL {
        assert!(logger.emit_with(
            Severity::Info,
            0,
            "LOGGING {} {} {}",
            ("BENCHMARK", i + 1, 42.42),
        ));
    }
    logger.stop();

    let info = read_sink(&tmp, Severity::Info);
    assert!(info.starts_with(SESSION_BANNER));

    let lines = entry_lines(&info);
    assert_eq!(lines.len() as u64, TOTAL);
    assert_eq!(text_field(lines[0]), "LOGGING BENCHMARK 1 42.42");
    assert_eq!(
        text_field(lines[lines.len() - 1]),
        "LOGGING BENCHMARK 1000000 42.42"
    );
}

#[test]
fn test_concurrent_producers_keep_per_shard_order() {
    const SHARDS: usize = 4;
    const PER_SHARD: usize = 50_000;

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::new();
    logger.initialize(&config(&tmp, SHARDS)).expect("initialize");
    logger.start().expect("start");

    thread::scope(|scope| {
        for shard in 0..SHARDS {
            let logger = &logger;
            scope.spawn(move || {
                for seq in 0..PER_SHARD {
                    assert!(logger.emit_with(Severity::Info, shard, "seq={}", (seq,)));
                }
            });
        }
    });
    logger.stop();

    let info = read_sink(&tmp, Severity::Info);
    let mut per_shard: Vec<Vec<usize>> = vec![Vec::new(); SHARDS];
    for line in entry_lines(&info) {
        let shard: usize = line
            .split('\t')
            .nth(2)
            .and_then(|field| field.strip_prefix("Thread ID : "))
            .expect("malformed shard field")
            .parse()
            .expect("shard id not a number");
        let seq: usize = text_field(line)
            .strip_prefix("seq=")
            .expect("malformed text field")
            .parse()
            .expect("sequence not a number");
        per_shard[shard].push(seq);
    }

    for (shard, seqs) in per_shard.iter().enumerate() {
        assert_eq!(seqs.len(), PER_SHARD, "shard {} lost records", shard);
        for (expected, seq) in seqs.iter().enumerate() {
            assert_eq!(*seq, expected, "shard {} out of order", shard);
        }
    }
}

#[test]
fn test_severity_cycling_fills_every_sink() {
    const PER_SEVERITY: usize = 1000;

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::new();
    logger.initialize(&config(&tmp, 1)).expect("initialize");
    logger.start().expect("start");

    for i in 0..PER_SEVERITY * Severity::COUNT {
        let severity = Severity::from_index(i % Severity::COUNT).unwrap();
        assert!(logger.emit_with(severity, 0, "cycle {}", (i,)));
    }
    logger.stop();

    for severity in Severity::ALL {
        let lines = entry_lines(&read_sink(&tmp, severity)).len();
        assert_eq!(lines, PER_SEVERITY, "{} sink incomplete", severity);
    }
}

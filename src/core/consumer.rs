//! Consumer workers
//!
//! One consumer thread per shard. Each consumer constructs its own queue and
//! publishes it into the shard table; producers can target a shard as soon
//! as its slot is non-empty, which is what the start barrier waits for.

use super::metrics::LoggerMetrics;
use super::record::Record;
use super::shard_queue::ShardQueue;
use super::timestamp;
use crate::sinks::SinkSet;
use crossbeam_utils::Backoff;
use parking_lot::RwLock;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Publication slots for the per-shard queues.
///
/// A consumer stores its queue on startup and clears the slot again on
/// shutdown; the slot lock gives the release/acquire pairing that makes the
/// queue pointer visible to producers once the start barrier has seen it.
pub(crate) struct ShardTable {
    slots: Vec<RwLock<Option<Arc<ShardQueue<Record>>>>>,
}

impl ShardTable {
    pub(crate) fn new(shard_count: usize) -> Self {
        Self {
            slots: (0..shard_count).map(|_| RwLock::new(None)).collect(),
        }
    }

    pub(crate) fn get(&self, shard: usize) -> Option<Arc<ShardQueue<Record>>> {
        self.slots.get(shard)?.read().clone()
    }

    pub(crate) fn all_published(&self) -> bool {
        self.slots.iter().all(|slot| slot.read().is_some())
    }

    fn publish(&self, shard: usize, queue: Arc<ShardQueue<Record>>) {
        *self.slots[shard].write() = Some(queue);
    }

    fn retire(&self, shard: usize) {
        *self.slots[shard].write() = None;
    }
}

/// Spawn the consumer thread for one shard.
pub(crate) fn spawn(
    shard_id: usize,
    shards: Arc<ShardTable>,
    terminate: Arc<Vec<AtomicBool>>,
    sinks: Arc<SinkSet>,
    metrics: Arc<LoggerMetrics>,
    pin_to_core: Option<usize>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("log-consumer-{}", shard_id))
        .spawn(move || run(shard_id, &shards, &terminate, &sinks, &metrics, pin_to_core))
}

fn run(
    shard_id: usize,
    shards: &ShardTable,
    terminate: &[AtomicBool],
    sinks: &SinkSet,
    metrics: &LoggerMetrics,
    pin_to_core: Option<usize>,
) {
    if let Some(cpu) = pin_to_core {
        pin_current_thread(cpu);
    }

    let queue = Arc::new(ShardQueue::new());
    shards.publish(shard_id, Arc::clone(&queue));

    let backoff = Backoff::new();
    loop {
        match queue.try_pop() {
            Some(record) => {
                backoff.reset();
                write_record(shard_id, record, sinks, metrics);
            }
            None => {
                if terminate[shard_id].load(Ordering::Acquire) {
                    // Everything pushed before the stop request is visible
                    // now; drain it before exiting.
                    while let Some(record) = queue.try_pop() {
                        write_record(shard_id, record, sinks, metrics);
                    }
                    break;
                }
                backoff.snooze();
            }
        }
    }

    shards.retire(shard_id);
}

fn write_record(shard_id: usize, record: Record, sinks: &SinkSet, metrics: &LoggerMetrics) {
    let severity = record.severity;
    let timestamp = record.timestamp;
    let text = record.into_message();
    let line = timestamp::format_line(&timestamp, shard_id, &text);
    match sinks.append(severity, &line) {
        Ok(()) => {
            metrics.record_written();
        }
        Err(err) => {
            metrics.record_write_failure();
            eprintln!("[LOGGER ERROR] sink write failed for {}: {}", severity, err);
        }
    }
}

/// Best-effort CPU affinity hint for a consumer thread.
#[cfg(target_os = "linux")]
fn pin_current_thread(cpu: usize) {
    use nix::sched::{sched_setaffinity, CpuSet};
    use nix::unistd::Pid;

    let mut cpus = CpuSet::new();
    if cpus.set(cpu).is_ok() {
        let _ = sched_setaffinity(Pid::from_raw(0), &cpus);
    }
}

#[cfg(not(target_os = "linux"))]
fn pin_current_thread(_cpu: usize) {}

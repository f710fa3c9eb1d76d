//! Lock-free unbounded MPMC queue for one shard
//!
//! A FIFO of heap-allocated values built as a linked list of fixed-size
//! nodes. Producers and the consumer reserve slots with fetch-and-add, so
//! the hot path is one atomic increment plus one compare-exchange; exhausted
//! nodes are retired through `crossbeam-epoch` so no thread ever frees a
//! node another thread may still be reading.

use crossbeam_epoch::{self as epoch, Atomic, Owned, Shared};
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Slots per internal node. The trade-off point between allocator pressure
/// (bigger nodes amortize better) and cache locality.
pub const NODE_SLOTS: usize = 2048;

/// Tag bit marking a slot whose reservation was abandoned by the consumer.
/// The racing producer's compare-exchange against the untagged null then
/// fails and the producer takes a fresh slot.
const TAKEN: usize = 1;

struct Node<T> {
    /// Next slot a producer may claim. May run past `NODE_SLOTS`.
    enqueue_idx: AtomicUsize,
    /// Next slot a popper may claim. May run past `NODE_SLOTS`.
    dequeue_idx: AtomicUsize,
    slots: [Atomic<T>; NODE_SLOTS],
    next: Atomic<Node<T>>,
}

impl<T> Node<T> {
    fn empty() -> Self {
        Self {
            enqueue_idx: AtomicUsize::new(0),
            dequeue_idx: AtomicUsize::new(0),
            slots: std::array::from_fn(|_| Atomic::null()),
            next: Atomic::null(),
        }
    }
}

/// Unbounded lock-free multi-producer / multi-consumer FIFO.
///
/// `push` never blocks and never fails; `try_pop` is non-blocking and
/// returns `None` when the queue is empty. Values are observed by exactly
/// one pop. FIFO order holds between any push→pop pair observed by a single
/// thread on the same queue.
pub struct ShardQueue<T> {
    head: Atomic<Node<T>>,
    tail: Atomic<Node<T>>,
}

// Values move through the queue by ownership transfer: a value is written by
// exactly one producer and read by exactly one popper, never shared.
unsafe impl<T: Send> Send for ShardQueue<T> {}
unsafe impl<T: Send> Sync for ShardQueue<T> {}

impl<T> ShardQueue<T> {
    pub fn new() -> Self {
        assert!(
            mem::align_of::<T>() > 1,
            "slot poisoning needs a pointer tag bit"
        );
        let queue = Self {
            head: Atomic::null(),
            tail: Atomic::null(),
        };
        unsafe {
            let guard = epoch::unprotected();
            let first = Owned::new(Node::empty()).into_shared(guard);
            queue.head.store(first, Ordering::Relaxed);
            queue.tail.store(first, Ordering::Relaxed);
        }
        queue
    }

    /// Append a value. Lock-free; the common path is one fetch-and-add and
    /// one compare-exchange on an empty slot.
    pub fn push(&self, value: T) {
        let guard = &epoch::pin();
        let mut item = Owned::new(value).into_shared(guard);

        loop {
            let tail = self.tail.load(Ordering::Acquire, guard);
            let node = unsafe { tail.deref() };

            let idx = node.enqueue_idx.fetch_add(1, Ordering::Relaxed);
            if idx < NODE_SLOTS {
                match node.slots[idx].compare_exchange(
                    Shared::null(),
                    item,
                    Ordering::Release,
                    Ordering::Relaxed,
                    guard,
                ) {
                    Ok(_) => return,
                    // Slot was poisoned by an overtaking popper; reserve a
                    // fresh one.
                    Err(err) => {
                        item = err.new;
                        continue;
                    }
                }
            }

            // This node is full: install a successor carrying our item in
            // slot 0, or chase the successor someone else installed.
            let next = node.next.load(Ordering::Acquire, guard);
            if next.is_null() {
                let successor = Owned::new(Node::empty());
                successor.slots[0].store(item, Ordering::Relaxed);
                successor.enqueue_idx.store(1, Ordering::Relaxed);
                match node.next.compare_exchange(
                    Shared::null(),
                    successor,
                    Ordering::Release,
                    Ordering::Acquire,
                    guard,
                ) {
                    Ok(installed) => {
                        let _ = self.tail.compare_exchange(
                            tail,
                            installed,
                            Ordering::Release,
                            Ordering::Relaxed,
                            guard,
                        );
                        return;
                    }
                    Err(err) => {
                        // Lost the install race; the item pointer is still
                        // ours, only the node allocation is discarded.
                        let _ = self.tail.compare_exchange(
                            tail,
                            err.current,
                            Ordering::Release,
                            Ordering::Relaxed,
                            guard,
                        );
                    }
                }
            } else {
                let _ = self.tail.compare_exchange(
                    tail,
                    next,
                    Ordering::Release,
                    Ordering::Relaxed,
                    guard,
                );
            }
        }
    }

    /// Remove and return the oldest value, or `None` when the queue is
    /// empty. A `None` during a concurrent, not-yet-completed `push` is
    /// possible; the value is observable once that push returns.
    pub fn try_pop(&self) -> Option<T> {
        let guard = &epoch::pin();

        loop {
            let head = self.head.load(Ordering::Acquire, guard);
            let node = unsafe { head.deref() };

            if node.dequeue_idx.load(Ordering::Relaxed)
                >= node.enqueue_idx.load(Ordering::Acquire)
                && node.next.load(Ordering::Acquire, guard).is_null()
            {
                return None;
            }

            let idx = node.dequeue_idx.fetch_add(1, Ordering::Relaxed);
            if idx < NODE_SLOTS {
                let item =
                    node.slots[idx].swap(Shared::null().with_tag(TAKEN), Ordering::AcqRel, guard);
                if item.is_null() {
                    // The producer that reserved this slot has not stored
                    // yet; the poison we left makes it re-reserve, so the
                    // value is not lost.
                    continue;
                }
                let value = unsafe { item.into_owned() }.into_box();
                return Some(*value);
            }

            // Head node exhausted; advance and retire it once no pinned
            // thread can still observe it.
            let next = node.next.load(Ordering::Acquire, guard);
            if next.is_null() {
                return None;
            }
            if self
                .head
                .compare_exchange(head, next, Ordering::Release, Ordering::Relaxed, guard)
                .is_ok()
            {
                unsafe { guard.defer_destroy(head) };
            }
        }
    }
}

impl<T> Default for ShardQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ShardQueue<T> {
    fn drop(&mut self) {
        // Exclusive access: free every remaining value and every node.
        unsafe {
            let guard = epoch::unprotected();
            let mut node_ptr = self.head.load(Ordering::Relaxed, guard);
            while !node_ptr.is_null() {
                let node = node_ptr.deref();
                for slot in node.slots.iter() {
                    let item = slot.load(Ordering::Relaxed, guard);
                    if !item.is_null() {
                        drop(item.into_owned());
                    }
                }
                let next = node.next.load(Ordering::Relaxed, guard);
                drop(node_ptr.into_owned());
                node_ptr = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn test_fifo_single_thread() {
        let queue = ShardQueue::new();
        for i in 0..1000u64 {
            queue.push(i);
        }
        for i in 0..1000u64 {
            assert_eq!(queue.try_pop(), Some(i));
        }
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn test_fifo_across_node_boundaries() {
        let queue = ShardQueue::new();
        let total = NODE_SLOTS as u64 * 2 + 500;
        for i in 0..total {
            queue.push(i);
        }
        for i in 0..total {
            assert_eq!(queue.try_pop(), Some(i));
        }
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn test_interleaved_push_pop() {
        let queue = ShardQueue::new();
        for round in 0..50u64 {
            for i in 0..100 {
                queue.push(round * 100 + i);
            }
            for i in 0..100 {
                assert_eq!(queue.try_pop(), Some(round * 100 + i));
            }
        }
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn test_mpmc_every_value_popped_exactly_once() {
        const PRODUCERS: u64 = 4;
        const CONSUMERS: usize = 2;
        const PER_PRODUCER: u64 = 20_000;
        const TOTAL: u64 = PRODUCERS * PER_PRODUCER;

        let queue = Arc::new(ShardQueue::new());
        let popped = Arc::new(Mutex::new(Vec::new()));
        let remaining = Arc::new(AtomicUsize::new(TOTAL as usize));

        let mut handles = Vec::new();
        for p in 0..PRODUCERS {
            let queue = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    queue.push(p * PER_PRODUCER + i);
                }
            }));
        }
        for _ in 0..CONSUMERS {
            let queue = Arc::clone(&queue);
            let popped = Arc::clone(&popped);
            let remaining = Arc::clone(&remaining);
            handles.push(thread::spawn(move || {
                let mut local = Vec::new();
                while remaining.load(Ordering::Acquire) > 0 {
                    if let Some(value) = queue.try_pop() {
                        local.push(value);
                        remaining.fetch_sub(1, Ordering::AcqRel);
                    } else {
                        thread::yield_now();
                    }
                }
                popped.lock().unwrap().extend(local);
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let popped = popped.lock().unwrap();
        assert_eq!(popped.len() as u64, TOTAL);
        let unique: HashSet<u64> = popped.iter().copied().collect();
        assert_eq!(unique.len() as u64, TOTAL);
    }

    #[test]
    fn test_per_producer_order_is_preserved() {
        const PER_PRODUCER: u64 = 30_000;

        let queue = Arc::new(ShardQueue::new());
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    queue.push(i);
                }
            })
        };

        let mut seen = 0u64;
        let mut last: Option<u64> = None;
        while seen < PER_PRODUCER {
            if let Some(value) = queue.try_pop() {
                if let Some(prev) = last {
                    assert!(value > prev, "FIFO violated: {} after {}", value, prev);
                }
                last = Some(value);
                seen += 1;
            }
        }
        producer.join().unwrap();
        assert_eq!(queue.try_pop(), None);
    }

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_drop_drains_remaining_values() {
        let drops = Arc::new(AtomicUsize::new(0));
        {
            let queue = ShardQueue::new();
            let total = NODE_SLOTS + 300;
            for _ in 0..total {
                queue.push(DropCounter(Arc::clone(&drops)));
            }
            for _ in 0..1000 {
                queue.try_pop();
            }
            assert_eq!(drops.load(Ordering::SeqCst), 1000);
        }
        assert_eq!(drops.load(Ordering::SeqCst), NODE_SLOTS + 300);
    }
}

//! Cancellable timer queue driving every animation in the app.
//!
//! All controllers own a `Timeline` and never read the wall clock
//! themselves: the event loop advances the timeline with elapsed time and
//! the timeline hands back the messages whose deadlines passed. That keeps
//! every sequence deterministic under test and puts cancellation in one
//! place: a controller's teardown is `clear()`, after which nothing it
//! scheduled can ever fire.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

// ── Handles ───────────────────────────────────────────────────────────────────

/// Identifies one `schedule`/`repeat` registration for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

// ── Entries ───────────────────────────────────────────────────────────────────

struct Entry<M> {
    due: Duration,
    /// Registration order; ties on `due` fire in registration order.
    seq: u64,
    id: u64,
    period: Option<Duration>,
    msg: M,
}

impl<M> PartialEq for Entry<M> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}
impl<M> Eq for Entry<M> {}

impl<M> PartialOrd for Entry<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap; reverse so the earliest deadline pops first.
impl<M> Ord for Entry<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

/// Logical-clock timer queue delivering typed messages.
pub struct Timeline<M> {
    heap: BinaryHeap<Entry<M>>,
    cancelled: HashSet<u64>,
    now: Duration,
    next_id: u64,
    next_seq: u64,
}

impl<M> Default for Timeline<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Timeline<M> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Current logical time (the last `pop_due` target or fired deadline).
    #[allow(dead_code)]
    pub fn now(&self) -> Duration {
        self.now
    }

    fn push(&mut self, due: Duration, period: Option<Duration>, msg: M) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { due, seq, id, period, msg });
        TimerHandle(id)
    }

    /// Deliver `msg` once, no earlier than `delay` from now.
    pub fn schedule(&mut self, delay: Duration, msg: M) -> TimerHandle {
        let due = self.now + delay;
        self.push(due, None, msg)
    }

    /// Deliver clones of `msg` every `interval`, first after one full
    /// interval, until cancelled. Cadence is fixed: re-arming is based on
    /// the previous deadline, not on when `pop_due` happened to run.
    pub fn repeat(&mut self, interval: Duration, msg: M) -> TimerHandle
    where
        M: Clone,
    {
        debug_assert!(interval > Duration::ZERO, "repeat interval must be nonzero");
        let due = self.now + interval;
        self.push(due, Some(interval), msg)
    }

    /// Cancel a registration. Idempotent; cancelling an already-fired
    /// one-shot is a no-op.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.cancelled.insert(handle.0);
    }

    /// Cancel everything outstanding. This is the teardown path: after
    /// `clear()` no previously scheduled message can be delivered.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.cancelled.clear();
    }

    /// Live registrations still waiting to fire.
    pub fn pending(&self) -> usize {
        self.heap
            .iter()
            .filter(|e| !self.cancelled.contains(&e.id))
            .count()
    }

    /// Earliest live deadline, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.heap
            .iter()
            .filter(|e| !self.cancelled.contains(&e.id))
            .map(|e| e.due)
            .min()
    }

    /// Pop the next message due at or before `now`, ordered by (deadline,
    /// registration). The logical clock moves to the popped entry's
    /// deadline before returning, so anything the caller schedules while
    /// handling the message is relative to that instant, so chained delays
    /// stay exact no matter how coarsely the event loop ticks. When
    /// nothing is due the clock moves to `now` and `None` is returned.
    /// Repeats re-arm on their fixed cadence and catch up interval by
    /// interval if the clock jumped.
    pub fn pop_due(&mut self, now: Duration) -> Option<M>
    where
        M: Clone,
    {
        loop {
            match self.heap.peek() {
                Some(top) if top.due <= now => {}
                _ => {
                    if now > self.now {
                        self.now = now;
                    }
                    return None;
                }
            }
            let Some(entry) = self.heap.pop() else { return None };
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            if entry.due > self.now {
                self.now = entry.due;
            }
            if let Some(period) = entry.period {
                // Same id so the handle keeps cancelling future firings.
                let seq = self.next_seq;
                self.next_seq += 1;
                self.heap.push(Entry {
                    due: entry.due + period,
                    seq,
                    id: entry.id,
                    period: Some(period),
                    msg: entry.msg.clone(),
                });
            }
            return Some(entry.msg);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

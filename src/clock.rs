//! Simulated clock and event queue.
//!
//! The clock owns the current simulated time and a priority queue of
//! pending resumptions. Each entry carries a monotonically increasing
//! sequence number: events at the same timestamp fire in insertion order,
//! which is the sole source of determinism in the simulation. The payload
//! type is generic so the clock stays ignorant of what a resumption means.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::types::SimTime;

/// A pending resumption, ordered by `(time, seq)`.
#[derive(Debug, Clone)]
struct Entry<T> {
    time: SimTime,
    /// Tiebreaker for entries at the same time (lower = fires first).
    seq: u64,
    wakeup: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The simulated clock plus its time-ordered queue of pending resumptions.
#[derive(Debug, Clone)]
pub struct SimClock<T> {
    now: SimTime,
    seq: u64,
    queue: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> SimClock<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current simulated time: the timestamp of the last fired entry.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Number of pending entries.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Enqueue a resumption to fire at `now + delay`.
    pub fn schedule_in(&mut self, delay: SimTime, wakeup: T) {
        let time = self.now.saturating_add(delay);
        self.queue.push(Reverse(Entry {
            time,
            seq: self.seq,
            wakeup,
        }));
        self.seq += 1;
    }

    /// Pop the earliest pending resumption and advance `now` to its time.
    ///
    /// Returns `None` when the queue is empty or the earliest entry lies
    /// beyond `horizon`. Entries beyond the horizon are never fired: the
    /// simulation truncates rather than erroring.
    pub fn pop_due(&mut self, horizon: SimTime) -> Option<T> {
        let due = self
            .queue
            .peek()
            .is_some_and(|Reverse(entry)| entry.time <= horizon);
        if !due {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        debug_assert!(
            entry.time >= self.now,
            "clock moved backwards: {} -> {}",
            self.now,
            entry.time
        );
        self.now = entry.time;
        Some(entry.wakeup)
    }
}

impl<T> Default for SimClock<T> {
    fn default() -> Self {
        Self::new()
    }
}

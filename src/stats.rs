//! Completion-time collection and summary statistics.

use crate::types::{Pid, SimTime};

/// One terminated process's completion record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub pid: Pid,
    /// Termination time minus creation time.
    pub duration: SimTime,
}

/// Collects `(pid, duration)` pairs as processes terminate.
///
/// Each record is written exactly once, by the terminating process's own
/// handler, in whatever order terminations occur. The sink is owned by
/// the simulation run and handed back in its result; there is no shared
/// or global state to contaminate a later run.
#[derive(Debug, Clone, Default)]
pub struct StatsSink {
    completions: Vec<Completion>,
}

impl StatsSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, pid: Pid, duration: SimTime) {
        self.completions.push(Completion { pid, duration });
    }

    /// The recorded completions, in termination order.
    ///
    /// Once the run has ended this is final and repeated calls return the
    /// same data. Reading it mid-run (from inside a handler) yields a
    /// partial, unstable snapshot; callers that need final results must
    /// read only after `run` returns.
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    pub fn len(&self) -> usize {
        self.completions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completions.is_empty()
    }

    /// Distribution of the recorded durations.
    pub fn summary(&self) -> DistributionStats {
        let mut stats = DistributionStats::new();
        for c in &self.completions {
            stats.add(c.duration);
        }
        stats
    }
}

/// Summary statistics over a set of durations.
///
/// Keeps running moments rather than the samples themselves, so a run
/// with millions of completions summarizes in constant space.
#[derive(Debug, Clone, Default)]
pub struct DistributionStats {
    /// Number of durations folded in.
    pub count: usize,
    /// Shortest duration seen, in ticks (0 when no samples).
    pub min: SimTime,
    /// Longest duration seen, in ticks (0 when no samples).
    pub max: SimTime,
    /// Total ticks across all samples.
    pub sum: SimTime,
    sum_sq: u128,
}

impl DistributionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one duration into the running summary.
    pub fn add(&mut self, value: SimTime) {
        self.min = if self.count == 0 {
            value
        } else {
            self.min.min(value)
        };
        self.max = self.max.max(value);
        self.count += 1;
        self.sum += value;
        self.sum_sq += u128::from(value) * u128::from(value);
    }

    /// Arithmetic mean, 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum as f64 / self.count as f64
    }

    /// Population standard deviation, 0.0 with fewer than two samples.
    pub fn stddev(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let mean_sq = self.sum_sq as f64 / self.count as f64;
        (mean_sq - mean * mean).max(0.0).sqrt()
    }
}

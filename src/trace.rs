//! Trace event recording for the simulator.
//!
//! Every lifecycle transition (creation, memory grant, burst start and
//! end, I/O wait, termination) is recorded as a `TraceEvent` with a
//! simulated timestamp. The trace is the output surface external
//! consumers read; the engine records, callers render.

use crate::process::ProcState;
use crate::types::{Pid, SimTime};

/// A single trace event produced by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// Simulated time in ticks when this event occurred.
    pub time: SimTime,
    /// The process this event belongs to.
    pub pid: Pid,
    /// The kind of event.
    pub kind: TraceKind,
}

/// The type of lifecycle event recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceKind {
    /// The generator registered a new process.
    Created { required_memory: u32, instructions: u32 },
    /// The memory pool granted the process's full demand.
    MemoryGranted { amount: u32 },
    /// The process started a CPU burst on an acquired slot.
    BurstStarted,
    /// A burst finished and the slot was returned.
    BurstCompleted { remaining: u32 },
    /// The process began a fixed I/O wait between bursts.
    IoStarted,
    /// The process returned its memory to the pool.
    MemoryReleased { amount: u32 },
    /// The process terminated; `duration` is end minus start time.
    Completed { duration: SimTime },
    /// Still not terminated when the run ended (end-of-run check).
    Stalled { state: ProcState },
}

/// A complete simulation trace, all events in firing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub(crate) fn record(&mut self, time: SimTime, pid: Pid, kind: TraceKind) {
        self.events.push(TraceEvent { time, pid, kind });
    }

    /// All events in firing order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Events belonging to one process, in firing order.
    pub fn events_for(&self, pid: Pid) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(move |e| e.pid == pid)
    }

    /// Number of bursts a process started.
    pub fn burst_count(&self, pid: Pid) -> usize {
        self.events_for(pid)
            .filter(|e| matches!(e.kind, TraceKind::BurstStarted))
            .count()
    }

    /// Number of processes that completed.
    pub fn completed_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Completed { .. }))
            .count()
    }

    /// Termination timestamp of a process, if it completed.
    pub fn completion_time(&self, pid: Pid) -> Option<SimTime> {
        self.events_for(pid)
            .find(|e| matches!(e.kind, TraceKind::Completed { .. }))
            .map(|e| e.time)
    }

    /// Pretty-print the trace to stderr for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            let desc = match &event.kind {
                TraceKind::Created {
                    required_memory,
                    instructions,
                } => format!("CREATED  mem={required_memory} instr={instructions}"),
                TraceKind::MemoryGranted { amount } => format!("MEMORY   amount={amount}"),
                TraceKind::BurstStarted => "RUNNING".to_string(),
                TraceKind::BurstCompleted { remaining } => {
                    format!("EXECUTED remaining={remaining}")
                }
                TraceKind::IoStarted => "WAITING".to_string(),
                TraceKind::MemoryReleased { amount } => format!("RELEASED amount={amount}"),
                TraceKind::Completed { duration } => format!("COMPLETE duration={duration}"),
                TraceKind::Stalled { state } => format!("STALLED  state={state:?}"),
            };
            eprintln!("[{:>8}] pid={:<3} {}", event.time, event.pid.0, desc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trace {
        let mut t = Trace::new();
        t.record(0, Pid(0), TraceKind::Created { required_memory: 5, instructions: 4 });
        t.record(0, Pid(0), TraceKind::MemoryGranted { amount: 5 });
        t.record(0, Pid(0), TraceKind::BurstStarted);
        t.record(1, Pid(0), TraceKind::BurstCompleted { remaining: 1 });
        t.record(1, Pid(0), TraceKind::BurstStarted);
        t.record(2, Pid(0), TraceKind::BurstCompleted { remaining: 0 });
        t.record(2, Pid(0), TraceKind::MemoryReleased { amount: 5 });
        t.record(2, Pid(0), TraceKind::Completed { duration: 2 });
        t.record(5, Pid(1), TraceKind::Created { required_memory: 8, instructions: 9 });
        t
    }

    #[test]
    fn test_counts() {
        let t = sample();
        assert_eq!(t.burst_count(Pid(0)), 2);
        assert_eq!(t.burst_count(Pid(1)), 0);
        assert_eq!(t.completed_count(), 1);
    }

    #[test]
    fn test_completion_time() {
        let t = sample();
        assert_eq!(t.completion_time(Pid(0)), Some(2));
        assert_eq!(t.completion_time(Pid(1)), None);
    }

    #[test]
    fn test_events_for_filters_by_pid() {
        let t = sample();
        assert_eq!(t.events_for(Pid(1)).count(), 1);
        assert!(t.events_for(Pid(0)).all(|e| e.pid == Pid(0)));
    }
}

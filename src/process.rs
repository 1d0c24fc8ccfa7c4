//! Per-process record and lifecycle states.

use crate::types::{Pid, SimTime};

/// Where a process is in its lifecycle.
///
/// The state doubles as the resume point: when a suspended process is
/// woken, the engine dispatches on this value to decide what the wakeup
/// means (memory granted, CPU granted, burst finished, I/O done).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    /// Registered but not yet asking for anything.
    Created,
    /// Suspended on the memory pool.
    AwaitingMemory,
    /// Holding memory, suspended on a CPU slot.
    AwaitingCpu,
    /// Holding a CPU slot for the duration of one burst.
    Running,
    /// Between bursts, suspended on simulated I/O.
    AwaitingIo,
    /// Finished: instructions drained and memory returned.
    Terminated,
}

/// One simulated process.
///
/// Fields are mutated only by the process's own state-machine handlers in
/// the engine; no other component writes here.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Pid,
    pub name: String,
    /// Memory units held from grant until termination.
    pub required_memory: u32,
    pub remaining_instructions: u32,
    pub start_time: SimTime,
    pub end_time: Option<SimTime>,
    pub state: ProcState,
}

impl Process {
    pub fn new(
        pid: Pid,
        required_memory: u32,
        instructions: u32,
        start_time: SimTime,
    ) -> Self {
        Self {
            pid,
            name: format!("proc{}", pid.0),
            required_memory,
            remaining_instructions: instructions,
            start_time,
            end_time: None,
            state: ProcState::Created,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.state == ProcState::Terminated
    }

    /// Completion time, once terminated.
    pub fn duration(&self) -> Option<SimTime> {
        self.end_time.map(|end| end - self.start_time)
    }
}

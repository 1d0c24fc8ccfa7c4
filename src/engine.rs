//! The discrete-event engine that drives a run.
//!
//! A [`Simulator`] owns all mutable state for one run: the clock, both
//! resource pools, the process table, the RNG, the trace and the stats
//! sink. A scheduled wakeup carries nothing beyond *who* to resume; the
//! process's own [`ProcState`](crate::process::ProcState) selects the
//! next step, so every handler is a plain method and the whole lifecycle
//! reads top to bottom in this file.

use std::io::{self, Write};

use tracing::{debug, info, warn};

use crate::clock::SimClock;
use crate::export;
use crate::fmt;
use crate::pool::{Grant, ResourcePool};
use crate::process::{ProcState, Process};
use crate::rng::SimRng;
use crate::scenario::Scenario;
use crate::stats::StatsSink;
use crate::trace::{Trace, TraceKind};
use crate::types::{Pid, SimTime};

/// What a clock entry asks the engine to do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wakeup {
    /// Spawn the next process of the arrival stream.
    NextArrival,
    /// Resume a suspended process; its state says where it left off.
    Resume { pid: Pid },
}

/// A single simulation run.
///
/// Built from a [`Scenario`], consumed by [`run`](Simulator::run).
pub struct Simulator {
    scenario: Scenario,
    clock: SimClock<Wakeup>,
    memory: ResourcePool,
    cpus: ResourcePool,
    procs: Vec<Process>,
    rng: SimRng,
    trace: Trace,
    stats: StatsSink,
    spawned: u32,
}

impl Simulator {
    pub fn new(scenario: Scenario) -> Self {
        let rng = SimRng::new(scenario.seed);
        let memory = ResourcePool::new(scenario.memory_capacity);
        let cpus = ResourcePool::new(scenario.cores);
        Self {
            clock: SimClock::new(),
            memory,
            cpus,
            procs: Vec::with_capacity(scenario.process_count as usize),
            rng,
            trace: Trace::new(),
            stats: StatsSink::new(),
            spawned: 0,
            scenario,
        }
    }

    /// Drive the run to completion and return what happened.
    ///
    /// Fires events in (time, insertion) order until the queue is empty
    /// or the next event lies past the horizon. Processes still alive at
    /// that point are recorded as stalled, wherever they were stuck.
    pub fn run(mut self) -> SimulationResult {
        fmt::set_sim_clock(self.clock.now());
        info!(
            processes = self.scenario.process_count,
            memory = self.scenario.memory_capacity,
            cores = self.scenario.cores,
            horizon = self.scenario.horizon,
            seed = self.scenario.seed,
            "START"
        );

        if self.scenario.process_count > 0 {
            self.clock.schedule_in(0, Wakeup::NextArrival);
        }

        while let Some(wakeup) = self.clock.pop_due(self.scenario.horizon) {
            fmt::set_sim_clock(self.clock.now());
            match wakeup {
                Wakeup::NextArrival => self.handle_arrival(),
                Wakeup::Resume { pid } => self.resume(pid),
            }
        }

        self.finish()
    }

    /// Spawn one process, then schedule the next arrival if any remain.
    fn handle_arrival(&mut self) {
        let (mem_lo, mem_hi) = self.scenario.memory_demand;
        let (instr_lo, instr_hi) = self.scenario.instruction_demand;
        let required_memory = self.rng.uniform(mem_lo, mem_hi);
        let instructions = self.rng.uniform(instr_lo, instr_hi);

        let now = self.clock.now();
        let pid = Pid(self.procs.len() as u32);
        self.procs
            .push(Process::new(pid, required_memory, instructions, now));
        self.trace.record(
            now,
            pid,
            TraceKind::Created {
                required_memory,
                instructions,
            },
        );
        info!(pid = pid.0, memory = required_memory, instructions, "CREATED");

        self.spawned += 1;
        if self.spawned < self.scenario.process_count {
            let delay = self
                .rng
                .exponential(self.scenario.mean_interarrival)
                .round() as SimTime;
            self.clock.schedule_in(delay, Wakeup::NextArrival);
        }

        self.request_memory(pid);
    }

    /// Continue a suspended process from wherever its state left it.
    fn resume(&mut self, pid: Pid) {
        let state = self.procs[pid.0 as usize].state;
        match state {
            ProcState::AwaitingMemory => self.memory_granted(pid),
            ProcState::AwaitingCpu => self.start_burst(pid),
            ProcState::Running => self.finish_burst(pid),
            ProcState::AwaitingIo => self.io_done(pid),
            ProcState::Created | ProcState::Terminated => {
                debug_assert!(false, "stray resume for pid={} in {:?}", pid.0, state);
            }
        }
    }

    fn request_memory(&mut self, pid: Pid) {
        let amount = self.procs[pid.0 as usize].required_memory;
        self.procs[pid.0 as usize].state = ProcState::AwaitingMemory;
        match self.memory.acquire(amount, pid) {
            Grant::Immediate => self.memory_granted(pid),
            Grant::Queued => debug!(pid = pid.0, amount, pool = "memory", "BLOCKED"),
        }
    }

    /// The process holds its memory for the rest of its life; next stop
    /// is the CPU queue.
    fn memory_granted(&mut self, pid: Pid) {
        let now = self.clock.now();
        let amount = self.procs[pid.0 as usize].required_memory;
        self.trace
            .record(now, pid, TraceKind::MemoryGranted { amount });
        info!(pid = pid.0, amount, "MEMORY");
        self.request_cpu(pid);
    }

    fn request_cpu(&mut self, pid: Pid) {
        self.procs[pid.0 as usize].state = ProcState::AwaitingCpu;
        match self.cpus.acquire(1, pid) {
            Grant::Immediate => self.start_burst(pid),
            Grant::Queued => debug!(pid = pid.0, pool = "cpu", "BLOCKED"),
        }
    }

    fn start_burst(&mut self, pid: Pid) {
        let now = self.clock.now();
        let proc = &mut self.procs[pid.0 as usize];
        proc.state = ProcState::Running;
        let remaining = proc.remaining_instructions;
        self.trace.record(now, pid, TraceKind::BurstStarted);
        info!(pid = pid.0, remaining, "RUNNING");
        self.clock
            .schedule_in(self.scenario.burst_duration, Wakeup::Resume { pid });
    }

    /// The burst timer fired: retire instructions and pick the next move.
    fn finish_burst(&mut self, pid: Pid) {
        let now = self.clock.now();
        let step = self.scenario.instructions_per_burst;
        let proc = &mut self.procs[pid.0 as usize];
        let executed = proc.remaining_instructions.min(step);
        proc.remaining_instructions -= executed;
        let remaining = proc.remaining_instructions;
        self.trace
            .record(now, pid, TraceKind::BurstCompleted { remaining });
        info!(pid = pid.0, executed, remaining, "EXECUTED");

        // The core is released on every path out of a burst.
        let granted = self.cpus.release(1);
        self.grant_wakeups(granted);

        if remaining == 0 {
            self.terminate(pid);
        } else if self.rng.coin() {
            self.procs[pid.0 as usize].state = ProcState::AwaitingIo;
            self.trace.record(now, pid, TraceKind::IoStarted);
            info!(pid = pid.0, "WAITING");
            self.clock
                .schedule_in(self.scenario.io_wait, Wakeup::Resume { pid });
        } else {
            self.request_cpu(pid);
        }
    }

    fn io_done(&mut self, pid: Pid) {
        debug!(pid = pid.0, "READY");
        self.request_cpu(pid);
    }

    /// Retire the process and hand its memory back to the pool.
    fn terminate(&mut self, pid: Pid) {
        let now = self.clock.now();
        let proc = &mut self.procs[pid.0 as usize];
        proc.state = ProcState::Terminated;
        proc.end_time = Some(now);
        let amount = proc.required_memory;
        let duration = now - proc.start_time;

        self.stats.record(pid, duration);
        self.trace
            .record(now, pid, TraceKind::MemoryReleased { amount });
        let granted = self.memory.release(amount);
        self.grant_wakeups(granted);
        self.trace.record(now, pid, TraceKind::Completed { duration });
        info!(pid = pid.0, duration, "COMPLETED");
    }

    /// Turn a release's grant list into same-time resume events. Fresh
    /// sequence numbers keep the granted pids in FIFO order.
    fn grant_wakeups(&mut self, granted: Vec<Pid>) {
        for pid in granted {
            self.clock.schedule_in(0, Wakeup::Resume { pid });
        }
    }

    fn finish(mut self) -> SimulationResult {
        let ended_at = self.clock.now();
        for idx in 0..self.procs.len() {
            if self.procs[idx].is_terminated() {
                continue;
            }
            let pid = self.procs[idx].pid;
            let state = self.procs[idx].state;
            self.trace.record(ended_at, pid, TraceKind::Stalled { state });
            warn!(pid = pid.0, state = ?state, "STALLED");
        }
        info!(
            completed = self.stats.len(),
            spawned = self.spawned,
            ended_at,
            "DONE"
        );
        SimulationResult {
            scenario: self.scenario,
            trace: self.trace,
            stats: self.stats,
            processes: self.procs,
            ended_at,
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// The scenario the run was built from.
    pub scenario: Scenario,
    /// Ordered record of everything that happened.
    pub trace: Trace,
    /// Completion durations, in completion order.
    pub stats: StatsSink,
    /// Final snapshot of every process, indexed by pid.
    pub processes: Vec<Process>,
    /// Time of the last event that fired. 0 for an empty run.
    pub ended_at: SimTime,
}

impl SimulationResult {
    /// Pids that never terminated before the horizon cut the run off.
    pub fn stalled(&self) -> Vec<Pid> {
        self.processes
            .iter()
            .filter(|p| !p.is_terminated())
            .map(|p| p.pid)
            .collect()
    }

    /// Serialize the run (scenario, completions, stalls, full trace) as
    /// a single JSON object.
    pub fn write_json<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        export::write_json(self, writer)
    }
}

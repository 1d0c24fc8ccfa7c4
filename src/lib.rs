//! Deterministic event-driven simulation of processes contending for a
//! computer's memory and CPU cores.
//!
//! A [`Scenario`] describes the machine (memory capacity, core count)
//! and the workload (process count, arrival rate, demand ranges). The
//! [`Simulator`] replays it over a virtual clock: processes arrive at
//! exponentially distributed intervals, hold a random amount of memory
//! for their whole lifetime, and execute instructions in fixed-length
//! CPU bursts with optional I/O waits in between. Nothing blocks on the
//! host; waiting is a queue entry, and time advances only when the next
//! event fires.
//!
//! # Architecture
//!
//! - [`clock`]: the virtual clock, a (time, insertion order) min-heap.
//! - [`pool`]: FIFO-fair counting pools for memory units and CPU slots.
//! - [`process`]: the process table entry and its lifecycle states.
//! - [`engine`]: the event loop and the lifecycle handlers.
//! - [`trace`] / [`stats`]: what happened, and completion summaries.
//! - [`export`]: JSON dump of a finished run.
//!
//! # Usage
//!
//! ```
//! use procsim::{Scenario, Simulator};
//!
//! let scenario = Scenario::builder()
//!     .process_count(25)
//!     .memory_capacity(100)
//!     .cores(2)
//!     .build()
//!     .unwrap();
//! let result = Simulator::new(scenario).run();
//! println!("completed {} of 25", result.stats.len());
//! ```

pub mod clock;
pub mod engine;
pub mod export;
pub mod fmt;
pub mod pool;
pub mod process;
pub mod rng;
pub mod scenario;
pub mod stats;
pub mod trace;
pub mod types;

pub use clock::SimClock;
pub use engine::{SimulationResult, Simulator};
pub use fmt::{set_sim_clock, sim_clock, FmtTs, SimFormat};
pub use pool::{Grant, ResourcePool};
pub use process::{ProcState, Process};
pub use rng::SimRng;
pub use scenario::{Scenario, ScenarioBuilder, ScenarioError, DEFAULT_SEED};
pub use stats::{Completion, DistributionStats, StatsSink};
pub use trace::{Trace, TraceEvent, TraceKind};
pub use types::{Pid, SimTime};

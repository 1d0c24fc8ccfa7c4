//! Newtype wrappers and type aliases for domain concepts.
//!
//! A newtype for process identifiers prevents silent confusion with other
//! integer quantities (memory amounts, instruction counts). A type alias
//! for simulated time provides self-documenting code without the
//! boilerplate of implementing arithmetic traits.

/// Process identifier, assigned densely from 0 in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub u32);

/// Simulated time in abstract ticks.
///
/// One tick is the duration of one CPU burst under the default
/// configuration. All delays (bursts, I/O waits, inter-arrival gaps) are
/// expressed in this unit.
pub type SimTime = u64;

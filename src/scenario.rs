//! Scenario definition, builder API, and validation.

use crate::types::SimTime;

/// Default PRNG seed used when none is configured.
pub const DEFAULT_SEED: u32 = 42;

/// A complete simulation scenario: resource capacities, workload shape,
/// timing parameters, and the seed.
///
/// Defaults reproduce the canonical computer: 100 memory units, one core,
/// 25 processes arriving every 10 ticks on average, 3 instructions per
/// 1-tick burst, and a 500-tick horizon.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub seed: u32,
    /// Upper bound on simulated time; the run halts at or before it.
    pub horizon: SimTime,
    /// Mean of the exponential inter-arrival distribution, in ticks.
    pub mean_interarrival: f64,
    /// Total memory units available system-wide.
    pub memory_capacity: u32,
    /// Instructions retired by one CPU burst.
    pub instructions_per_burst: u32,
    /// Simulated time cost of one burst.
    pub burst_duration: SimTime,
    /// Concurrency capacity of the CPU pool.
    pub cores: u32,
    /// Total number of processes the generator creates. Zero is legal and
    /// yields an empty run.
    pub process_count: u32,
    /// Ticks a process spends waiting when the I/O coin lands heads.
    pub io_wait: SimTime,
    /// Inclusive range memory demands are drawn from. Pin it (lo == hi)
    /// to script a fixed demand.
    pub memory_demand: (u32, u32),
    /// Inclusive range instruction demands are drawn from.
    pub instruction_demand: (u32, u32),
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            horizon: 500,
            mean_interarrival: 10.0,
            memory_capacity: 100,
            instructions_per_burst: 3,
            burst_duration: 1,
            cores: 1,
            process_count: 25,
            io_wait: 1,
            memory_demand: (1, 10),
            instruction_demand: (1, 10),
        }
    }
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder {
            scenario: Scenario::default(),
        }
    }
}

/// Builder for constructing scenarios.
pub struct ScenarioBuilder {
    scenario: Scenario,
}

impl ScenarioBuilder {
    pub fn seed(mut self, seed: u32) -> Self {
        self.scenario.seed = seed;
        self
    }

    /// Set the simulation horizon in ticks.
    pub fn horizon(mut self, ticks: SimTime) -> Self {
        self.scenario.horizon = ticks;
        self
    }

    /// Set the mean inter-arrival interval in ticks.
    pub fn mean_interarrival(mut self, ticks: f64) -> Self {
        self.scenario.mean_interarrival = ticks;
        self
    }

    /// Set the memory pool capacity in units.
    pub fn memory_capacity(mut self, units: u32) -> Self {
        self.scenario.memory_capacity = units;
        self
    }

    /// Set the instructions retired per CPU burst.
    pub fn instructions_per_burst(mut self, n: u32) -> Self {
        self.scenario.instructions_per_burst = n;
        self
    }

    /// Set the simulated duration of one burst.
    pub fn burst_duration(mut self, ticks: SimTime) -> Self {
        self.scenario.burst_duration = ticks;
        self
    }

    /// Set the number of CPU cores.
    pub fn cores(mut self, n: u32) -> Self {
        self.scenario.cores = n;
        self
    }

    /// Set the number of processes the generator creates.
    pub fn process_count(mut self, n: u32) -> Self {
        self.scenario.process_count = n;
        self
    }

    /// Set the fixed I/O wait duration.
    pub fn io_wait(mut self, ticks: SimTime) -> Self {
        self.scenario.io_wait = ticks;
        self
    }

    /// Set the inclusive memory demand range.
    pub fn memory_demand(mut self, lo: u32, hi: u32) -> Self {
        self.scenario.memory_demand = (lo, hi);
        self
    }

    /// Set the inclusive instruction demand range.
    pub fn instruction_demand(mut self, lo: u32, hi: u32) -> Self {
        self.scenario.instruction_demand = (lo, hi);
        self
    }

    /// Validate and build the scenario.
    pub fn build(self) -> Result<Scenario, ScenarioError> {
        let s = self.scenario;
        if s.memory_capacity == 0 {
            return Err(ScenarioError::ZeroMemoryCapacity);
        }
        if s.cores == 0 {
            return Err(ScenarioError::ZeroCores);
        }
        if s.instructions_per_burst == 0 {
            return Err(ScenarioError::ZeroInstructionsPerBurst);
        }
        if !(s.mean_interarrival > 0.0 && s.mean_interarrival.is_finite()) {
            return Err(ScenarioError::BadInterval(s.mean_interarrival));
        }
        for (which, (lo, hi)) in [
            ("memory", s.memory_demand),
            ("instruction", s.instruction_demand),
        ] {
            if lo == 0 || lo > hi {
                return Err(ScenarioError::BadDemandRange { which, lo, hi });
            }
        }
        Ok(s)
    }
}

/// A scenario that cannot be simulated, reported before the run starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioError {
    /// A zero-capacity memory pool deadlocks every process.
    ZeroMemoryCapacity,
    /// The CPU pool needs at least one slot.
    ZeroCores,
    /// Bursts that retire no instructions never drain a process.
    ZeroInstructionsPerBurst,
    /// The mean inter-arrival interval must be positive and finite.
    BadInterval(f64),
    /// A demand range must satisfy `1 <= lo <= hi`.
    BadDemandRange { which: &'static str, lo: u32, hi: u32 },
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::ZeroMemoryCapacity => {
                write!(f, "memory capacity must be positive")
            }
            ScenarioError::ZeroCores => write!(f, "core count must be positive"),
            ScenarioError::ZeroInstructionsPerBurst => {
                write!(f, "instructions per burst must be positive")
            }
            ScenarioError::BadInterval(v) => {
                write!(f, "mean inter-arrival interval must be positive and finite, got {v}")
            }
            ScenarioError::BadDemandRange { which, lo, hi } => {
                write!(f, "{which} demand range [{lo}, {hi}] must satisfy 1 <= lo <= hi")
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

/// Parse an inclusive demand range from a flag value.
///
/// Supported formats:
/// - `"1..10"` — inclusive range
/// - `"5"` — single value, pinning the demand (equivalent to `"5..5"`)
///
/// Returns an error string if the input cannot be parsed. Bound ordering
/// is left to [`ScenarioBuilder::build`], which rejects inverted ranges.
pub fn parse_demand_range(s: &str) -> Result<(u32, u32), String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty demand range".into());
    }
    if let Some((lo, hi)) = s.split_once("..") {
        let lo = lo
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("bad lower bound {:?}: expected an integer", lo.trim()))?;
        let hi = hi
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("bad upper bound {:?}: expected an integer", hi.trim()))?;
        Ok((lo, hi))
    } else {
        let v = s
            .parse::<u32>()
            .map_err(|_| format!("bad demand {s:?}: expected an integer or LO..HI"))?;
        Ok((v, v))
    }
}

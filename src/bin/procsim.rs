//! procsim: simulate a population of processes contending for a
//! computer's memory and CPU.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use procsim::scenario::parse_demand_range;
use procsim::{Scenario, SimFormat, SimulationResult, Simulator, DEFAULT_SEED};

/// Simulate processes contending for bounded memory and CPU cores.
#[derive(Parser)]
#[command(name = "procsim")]
struct Cli {
    /// Number of processes to spawn.
    #[arg(short = 'n', long, default_value_t = 25)]
    processes: u32,

    /// Memory capacity, in units.
    #[arg(short, long, default_value_t = 100)]
    memory: u32,

    /// Number of CPU cores.
    #[arg(short, long, default_value_t = 1)]
    cores: u32,

    /// Simulation horizon in ticks; events past it never fire.
    #[arg(long, default_value_t = 500)]
    horizon: u64,

    /// Mean inter-arrival gap in ticks (exponentially distributed).
    #[arg(long, value_name = "TICKS", default_value_t = 10.0)]
    interval: f64,

    /// Instructions retired per CPU burst.
    #[arg(long, default_value_t = 3)]
    burst_instructions: u32,

    /// Length of one CPU burst in ticks.
    #[arg(long, default_value_t = 1)]
    burst_duration: u64,

    /// Length of one I/O wait in ticks.
    #[arg(long, default_value_t = 1)]
    io_wait: u64,

    /// Memory demand range, both bounds inclusive.
    ///
    /// A single value pins the demand: "--memory-demand 5" makes every
    /// process request exactly 5 units.
    #[arg(long, value_name = "LO..HI", default_value = "1..10",
          value_parser = parse_demand_range)]
    memory_demand: (u32, u32),

    /// Instruction demand range, both bounds inclusive.
    #[arg(long, value_name = "LO..HI", default_value = "1..10",
          value_parser = parse_demand_range)]
    instruction_demand: (u32, u32),

    /// PRNG seed.
    ///
    /// Demands, arrival gaps and I/O coin flips all derive from this
    /// seed; the same seed replays the same run. Falls back to the
    /// PROCSIM_SEED env var, then the default (42).
    #[arg(long, env = "PROCSIM_SEED", default_value_t = DEFAULT_SEED)]
    seed: u32,

    /// Print the event trace to stderr after the run.
    #[arg(long)]
    dump_trace: bool,

    /// Write the full run (scenario, completions, trace) as JSON.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let scenario = Scenario::builder()
        .process_count(cli.processes)
        .memory_capacity(cli.memory)
        .cores(cli.cores)
        .horizon(cli.horizon)
        .mean_interarrival(cli.interval)
        .instructions_per_burst(cli.burst_instructions)
        .burst_duration(cli.burst_duration)
        .io_wait(cli.io_wait)
        .memory_demand(cli.memory_demand.0, cli.memory_demand.1)
        .instruction_demand(cli.instruction_demand.0, cli.instruction_demand.1)
        .seed(cli.seed)
        .build()?;

    let result = Simulator::new(scenario).run();

    if cli.dump_trace {
        result.trace.dump();
    }

    print_summary(&result);

    if let Some(path) = &cli.json {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        result
            .write_json(&mut file)
            .context("failed to write run JSON")?;
        eprintln!("wrote run to {}", path.display());
    }

    Ok(())
}

fn print_summary(result: &SimulationResult) {
    println!(
        "completed {}/{} processes in {} ticks",
        result.stats.len(),
        result.processes.len(),
        result.ended_at
    );
    if !result.stats.is_empty() {
        let summary = result.stats.summary();
        println!(
            "duration  mean={:.1}  stddev={:.1}  min={}  max={}",
            summary.mean(),
            summary.stddev(),
            summary.min,
            summary.max
        );
    }
    for pid in result.stalled() {
        let state = result.processes[pid.0 as usize].state;
        println!("stalled   pid={:<3} state={state:?}", pid.0);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .event_format(SimFormat)
        .try_init();
}

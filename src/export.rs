//! JSON export of a finished run.
//!
//! Writes one object holding the scenario, the completion list, any
//! stalled pids and the full event trace. Event rows are streamed to the
//! writer one per line.

use std::io::{self, Write};

use serde_json::{json, Value};

use crate::engine::SimulationResult;
use crate::trace::{TraceEvent, TraceKind};

/// Write `result` to `writer` as one JSON object.
pub fn write_json<W: Write>(result: &SimulationResult, writer: &mut W) -> io::Result<()> {
    let scenario = &result.scenario;
    let header = json!({
        "seed": scenario.seed,
        "horizon": scenario.horizon,
        "processes": scenario.process_count,
        "memory_capacity": scenario.memory_capacity,
        "cores": scenario.cores,
        "mean_interarrival": scenario.mean_interarrival,
        "instructions_per_burst": scenario.instructions_per_burst,
        "burst_duration": scenario.burst_duration,
        "io_wait": scenario.io_wait,
        "memory_demand": [scenario.memory_demand.0, scenario.memory_demand.1],
        "instruction_demand": [scenario.instruction_demand.0, scenario.instruction_demand.1],
    });

    writeln!(writer, "{{")?;
    writeln!(writer, "  \"scenario\": {header},")?;
    writeln!(writer, "  \"ended_at\": {},", result.ended_at)?;

    writeln!(writer, "  \"completions\": [")?;
    let mut first = true;
    for c in result.stats.completions() {
        write_comma(writer, &mut first)?;
        let row = json!({ "pid": c.pid.0, "duration": c.duration });
        write!(writer, "    {row}")?;
    }
    writeln!(writer)?;
    writeln!(writer, "  ],")?;

    let stalled: Vec<u32> = result.stalled().iter().map(|p| p.0).collect();
    writeln!(writer, "  \"stalled\": {},", json!(stalled))?;

    writeln!(writer, "  \"events\": [")?;
    let mut first = true;
    for event in result.trace.events() {
        write_comma(writer, &mut first)?;
        write!(writer, "    {}", event_row(event))?;
    }
    writeln!(writer)?;
    writeln!(writer, "  ]")?;
    writeln!(writer, "}}")
}

fn write_comma<W: Write>(writer: &mut W, first: &mut bool) -> io::Result<()> {
    if *first {
        *first = false;
    } else {
        writeln!(writer, ",")?;
    }
    Ok(())
}

fn event_row(event: &TraceEvent) -> Value {
    let time = event.time;
    let pid = event.pid.0;
    match event.kind {
        TraceKind::Created {
            required_memory,
            instructions,
        } => json!({
            "time": time, "pid": pid, "event": "created",
            "memory": required_memory, "instructions": instructions,
        }),
        TraceKind::MemoryGranted { amount } => json!({
            "time": time, "pid": pid, "event": "memory_granted", "amount": amount,
        }),
        TraceKind::BurstStarted => json!({
            "time": time, "pid": pid, "event": "burst_started",
        }),
        TraceKind::BurstCompleted { remaining } => json!({
            "time": time, "pid": pid, "event": "burst_completed", "remaining": remaining,
        }),
        TraceKind::IoStarted => json!({
            "time": time, "pid": pid, "event": "io_started",
        }),
        TraceKind::MemoryReleased { amount } => json!({
            "time": time, "pid": pid, "event": "memory_released", "amount": amount,
        }),
        TraceKind::Completed { duration } => json!({
            "time": time, "pid": pid, "event": "completed", "duration": duration,
        }),
        TraceKind::Stalled { state } => json!({
            "time": time, "pid": pid, "event": "stalled", "state": format!("{state:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::Simulator;
    use crate::scenario::Scenario;

    #[test]
    fn test_export_is_valid_json() {
        let scenario = Scenario::builder()
            .process_count(1)
            .memory_demand(5, 5)
            .instruction_demand(3, 3)
            .build()
            .unwrap();
        let result = Simulator::new(scenario).run();

        let mut out = Vec::new();
        result.write_json(&mut out).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["ended_at"], 1);
        assert_eq!(parsed["scenario"]["processes"], 1);
        assert_eq!(parsed["completions"][0]["duration"], 1);
        assert_eq!(parsed["events"].as_array().unwrap().len(), 6);
        assert_eq!(parsed["events"][0]["event"], "created");
        assert!(parsed["stalled"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_export_records_stalls() {
        // Demand pinned above capacity: the process can never start.
        let scenario = Scenario::builder()
            .process_count(1)
            .memory_capacity(5)
            .memory_demand(8, 8)
            .build()
            .unwrap();
        let result = Simulator::new(scenario).run();

        let mut out = Vec::new();
        result.write_json(&mut out).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["stalled"], serde_json::json!([0]));
        assert!(parsed["completions"].as_array().unwrap().is_empty());
    }
}

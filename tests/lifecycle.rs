use procsim::*;

mod common;

/// A process with pinned demands (5 memory, 4 instructions) needs two
/// bursts; the only variation is the coin flip between them, so its
/// lifetime is 2 ticks without the I/O wait and 3 with it.
#[test]
fn test_pinned_demands_complete_in_two_or_three_ticks() {
    common::setup();
    let mut seen = Vec::new();
    for seed in 0..20 {
        let scenario = Scenario::builder()
            .seed(seed)
            .process_count(1)
            .memory_demand(5, 5)
            .instruction_demand(4, 4)
            .horizon(50)
            .build()
            .unwrap();
        let result = Simulator::new(scenario).run();

        assert_eq!(
            result.stats.completions().len(),
            1,
            "seed {seed}: process did not complete"
        );
        let duration = result.stats.completions()[0].duration;
        assert!(
            duration == 2 || duration == 3,
            "seed {seed}: duration {duration} outside {{2, 3}}"
        );
        seen.push(duration);
    }
    assert!(seen.contains(&2), "no seed skipped the I/O wait");
    assert!(seen.contains(&3), "no seed took the I/O wait");
}

/// The coin flip is observable in the trace: a run with the I/O wait
/// records `IoStarted`, a run without it does not.
#[test]
fn test_io_wait_shows_up_in_the_trace() {
    common::setup();
    let run = |seed| {
        let scenario = Scenario::builder()
            .seed(seed)
            .process_count(1)
            .memory_demand(5, 5)
            .instruction_demand(4, 4)
            .horizon(50)
            .build()
            .unwrap();
        Simulator::new(scenario).run()
    };

    // Seed 2 flips heads between the two bursts, seed 0 flips tails.
    let with_io = run(2);
    assert!(
        with_io
            .trace
            .events()
            .iter()
            .any(|e| matches!(e.kind, TraceKind::IoStarted)),
        "expected an I/O wait in the trace"
    );
    assert_eq!(with_io.stats.completions()[0].duration, 3);

    let without_io = run(0);
    assert!(
        !without_io
            .trace
            .events()
            .iter()
            .any(|e| matches!(e.kind, TraceKind::IoStarted)),
        "expected no I/O wait in the trace"
    );
    assert_eq!(without_io.stats.completions()[0].duration, 2);
}

/// Memory is granted once at admission and released once at exit, both
/// for the full demand.
#[test]
fn test_memory_granted_and_released_exactly_once() {
    common::setup();
    let scenario = Scenario::builder()
        .process_count(1)
        .memory_demand(5, 5)
        .instruction_demand(4, 4)
        .horizon(50)
        .build()
        .unwrap();
    let result = Simulator::new(scenario).run();

    let grants: Vec<u32> = result
        .trace
        .events()
        .iter()
        .filter_map(|e| match e.kind {
            TraceKind::MemoryGranted { amount } => Some(amount),
            _ => None,
        })
        .collect();
    let releases: Vec<u32> = result
        .trace
        .events()
        .iter()
        .filter_map(|e| match e.kind {
            TraceKind::MemoryReleased { amount } => Some(amount),
            _ => None,
        })
        .collect();

    assert_eq!(grants, vec![5], "memory granted a wrong number of times");
    assert_eq!(releases, vec![5], "memory released a wrong number of times");
}

/// Bursts retire `min(per_burst, remaining)`: a 7-instruction process
/// steps through 4, 1, 0. Seed 0 flips tails on both coins, so the three
/// bursts run back to back.
#[test]
fn test_bursts_retire_at_most_three_instructions() {
    common::setup();
    let scenario = Scenario::builder()
        .seed(0)
        .process_count(1)
        .memory_demand(5, 5)
        .instruction_demand(7, 7)
        .horizon(100)
        .build()
        .unwrap();
    let result = Simulator::new(scenario).run();

    let remaining: Vec<u32> = result
        .trace
        .events()
        .iter()
        .filter_map(|e| match e.kind {
            TraceKind::BurstCompleted { remaining } => Some(remaining),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, vec![4, 1, 0]);
    assert_eq!(result.stats.completions()[0].duration, 3);
}

/// The canonical machine (25 processes, 100 memory, 1 core, horizon 500)
/// finishes its whole population with time to spare.
#[test]
fn test_default_scenario_completes_everything() {
    common::setup();
    let result = Simulator::new(Scenario::default()).run();

    assert_eq!(result.processes.len(), 25, "not every process arrived");
    assert!(
        result.stalled().is_empty(),
        "processes stalled: {:?}",
        result.stalled()
    );
    assert_eq!(result.stats.completions().len(), 25);
    assert!(result.ended_at <= 500);

    for proc in &result.processes {
        assert_eq!(
            proc.remaining_instructions, 0,
            "{} terminated with instructions left",
            proc.name
        );
        let end = proc.end_time.unwrap();
        assert!(
            end >= proc.start_time,
            "{} ended before it started",
            proc.name
        );
        assert_eq!(proc.duration(), Some(end - proc.start_time));
    }
}

/// Zero processes is a legal scenario: the run ends at time 0 with
/// nothing recorded.
#[test]
fn test_zero_processes_is_an_empty_run() {
    common::setup();
    let scenario = Scenario::builder().process_count(0).build().unwrap();
    let result = Simulator::new(scenario).run();

    assert_eq!(result.ended_at, 0);
    assert!(result.processes.is_empty());
    assert!(result.trace.events().is_empty());
    assert!(result.stats.is_empty());
    assert_eq!(result.stats.summary().count, 0);
}

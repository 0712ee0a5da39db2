/*!
 * Scheduler Properties
 * Randomized workloads checked against the engine's observable invariants
 */

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::VecDeque;
use tick_sched::{Algorithm, EventLog, Process, SchedEvent, Scheduler, SchedulerConfig, Ticks};

#[derive(Debug, Clone, Copy)]
struct Entry {
    start: Ticks,
    duration: Ticks,
    deadline: Ticks,
}

fn workload() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec((0u64..8, 1u64..6, 1u64..12), 1..8).prop_map(|raw| {
        raw.into_iter()
            .map(|(start, duration, slack)| Entry {
                start,
                duration,
                deadline: start + duration + slack,
            })
            .collect()
    })
}

struct Outcome {
    events: Vec<SchedEvent<usize>>,
    finished: bool,
}

fn simulate(config: SchedulerConfig, entries: &[Entry]) -> Outcome {
    let mut sched = Scheduler::with_observer(config, EventLog::new()).unwrap();
    sched.submit(
        entries
            .iter()
            .enumerate()
            .map(|(id, s)| Process::new(id, s.start, s.duration, s.deadline).unwrap()),
    );

    let max_start = entries.iter().map(|s| s.start).max().unwrap_or(0);
    let total: Ticks = entries.iter().map(|s| s.duration).sum();
    let limit = max_start + total * (1 + config.overload) + 2;
    while !sched.all_finished() && sched.now() < limit {
        sched.tick();
    }

    Outcome {
        finished: sched.all_finished(),
        events: sched.into_observer().take(),
    }
}

fn check_lifecycle(entries: &[Entry], events: &[SchedEvent<usize>]) -> Result<(), TestCaseError> {
    for (id, entry) in entries.iter().enumerate() {
        let mut starts = Vec::new();
        let mut finishes = Vec::new();
        let mut ticks = Vec::new();
        for event in events.iter().filter(|e| *e.process() == id) {
            match event {
                SchedEvent::ProcessStart { at, .. } => starts.push(*at),
                SchedEvent::ProcessFinish { at, .. } => finishes.push(*at),
                SchedEvent::ProcessTick { at, elapsed, .. } => ticks.push((*at, *elapsed)),
                _ => {}
            }
        }

        prop_assert_eq!(starts.len(), 1);
        prop_assert_eq!(finishes.len(), 1);
        let elapsed: Vec<Ticks> = ticks.iter().map(|t| t.1).collect();
        prop_assert_eq!(elapsed, (1..=entry.duration).collect::<Vec<_>>());
        prop_assert_eq!(starts[0], ticks[0].0);
        prop_assert_eq!(finishes[0], ticks[ticks.len() - 1].0);
        prop_assert!(ticks[0].0 >= entry.start.max(1));
    }
    Ok(())
}

fn check_slot(
    config: SchedulerConfig,
    events: &[SchedEvent<usize>],
) -> Result<(), TestCaseError> {
    let mut holder: Option<usize> = None;
    let mut run_length: Ticks = 0;
    let mut last_tick: Ticks = 0;
    // A preempted process is always ready again, so the slot must resume right after the window
    let mut resume_at: Option<Ticks> = None;

    for event in events {
        match *event {
            SchedEvent::EnterExecution { process, .. } => {
                prop_assert_eq!(holder, None);
                holder = Some(process);
                run_length = 0;
            }
            SchedEvent::ProcessTick { at, process, .. } => {
                prop_assert_eq!(holder, Some(process));
                prop_assert!(at > last_tick, "two units of work on tick {}", at);
                if let Some(expected) = resume_at.take() {
                    prop_assert_eq!(at, expected, "slot did not resume right after overload");
                }
                last_tick = at;
                run_length += 1;
            }
            SchedEvent::LeaveExecution {
                at,
                process,
                finished,
            } => {
                prop_assert_eq!(holder, Some(process));
                holder = None;

                if config.algorithm.is_preemptive() {
                    prop_assert!(run_length <= config.quantum);
                    if !finished {
                        prop_assert_eq!(run_length, config.quantum);
                        resume_at = Some(at + config.overload + 1);
                    }
                } else {
                    prop_assert!(finished, "{} preempted process {}", config.algorithm, process);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_selection(
    config: SchedulerConfig,
    entries: &[Entry],
    events: &[SchedEvent<usize>],
) -> Result<(), TestCaseError> {
    let mut ready: VecDeque<usize> = VecDeque::new();

    for event in events {
        match *event {
            SchedEvent::EnterReadyQueue { process, .. } => ready.push_back(process),
            SchedEvent::EnterExecution { process, .. } => {
                let expected = match config.algorithm {
                    Algorithm::Fifo | Algorithm::RoundRobin => ready.front().copied(),
                    Algorithm::Sjf => ready
                        .iter()
                        .copied()
                        .min_by_key(|&id| (entries[id].duration, entries[id].start, id)),
                    Algorithm::Edf => ready
                        .iter()
                        .copied()
                        .min_by_key(|&id| (entries[id].deadline, entries[id].start, id)),
                };
                prop_assert_eq!(expected, Some(process));
                ready.retain(|&id| id != process);
            }
            _ => {}
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn engine_invariants(
        entries in workload(),
        algorithm in prop::sample::select(Algorithm::ALL.to_vec()),
        quantum in 1u64..4,
        overload in 0u64..3,
    ) {
        let config = SchedulerConfig::new(algorithm)
            .with_quantum(quantum)
            .with_overload(overload);
        let outcome = simulate(config, &entries);

        prop_assert!(outcome.finished, "workload did not finish under {:?}", config);
        check_lifecycle(&entries, &outcome.events)?;
        check_slot(config, &outcome.events)?;
        check_selection(config, &entries, &outcome.events)?;
    }

    #[test]
    fn non_preemptive_runs_to_completion(
        entries in workload(),
        sjf in any::<bool>(),
    ) {
        let algorithm = if sjf { Algorithm::Sjf } else { Algorithm::Fifo };
        let outcome = simulate(SchedulerConfig::new(algorithm).with_quantum(1), &entries);

        let dispatches = outcome
            .events
            .iter()
            .filter(|e| matches!(e, SchedEvent::EnterExecution { .. }))
            .count();
        prop_assert_eq!(dispatches, entries.len());
    }
}

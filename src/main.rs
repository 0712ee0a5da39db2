use anyhow::Context;
use rand::prelude::*;
use tick_sched::{Algorithm, Job, SchedulerConfig, Sim};
use tracing_subscriber::EnvFilter;

const MAX_TICKS: u64 = 10_000;
const ARRIVAL_TICKS: u64 = 60;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let configs = match std::env::var("SCHED_CONFIG") {
        Ok(raw) => vec![SchedulerConfig::from_json(&raw).context("parsing SCHED_CONFIG")?],
        Err(_) => Algorithm::ALL
            .iter()
            .map(|&algorithm| {
                SchedulerConfig::new(algorithm)
                    .with_quantum(3)
                    .with_overload(1)
            })
            .collect(),
    };

    let jobs = bernoulli_jobs(ARRIVAL_TICKS, 0.3, 0.3, 2, 6, 0);
    println!("{} jobs over {} ticks of arrivals", jobs.len(), ARRIVAL_TICKS);

    for config in configs {
        let mut sim = Sim::new(config, jobs.clone())?;
        let report = sim.run(MAX_TICKS);

        println!("{report}");
        println!("  {}", sim.timeline().render());
    }

    Ok(())
}

fn bernoulli_jobs(
    ticks: u64,
    p_arrival: f64,
    p_short: f64,
    short_ticks: u64,
    long_ticks: u64,
    seed: u64,
) -> Vec<Job> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jobs = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let duration = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };
            // Deadlines leave between 1x and 4x the job's own duration of slack
            let slack = duration * rng.random_range(1..=4);

            jobs.push(Job {
                id: jobs.len() as u64,
                start: t,
                duration,
                deadline: t + duration + slack,
            });
        }
    }

    jobs
}

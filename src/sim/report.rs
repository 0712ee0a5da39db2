use average::Mean;
use serde::Serialize;
use std::fmt;

use super::job::JobInstance;
use crate::{
    config::SchedulerConfig,
    core::{SchedStats, Ticks},
};

/// Summary of a finished (or tick-limited) simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub config: SchedulerConfig,
    pub makespan: Ticks,
    pub jobs: usize,
    pub completed: usize,
    pub avg_response: f64,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub deadline_misses: usize,
    pub stats: SchedStats,
}

impl SimReport {
    pub fn new(
        config: SchedulerConfig,
        makespan: Ticks,
        jobs: &[JobInstance],
        stats: SchedStats,
    ) -> Self {
        Self {
            config,
            makespan,
            jobs: jobs.len(),
            completed: jobs.iter().filter(|j| j.completion_time.is_some()).count(),
            avg_response: avg(jobs.iter().filter_map(JobInstance::response_time)),
            avg_turnaround: avg(jobs.iter().filter_map(JobInstance::turnaround_time)),
            avg_waiting: avg(jobs.iter().filter_map(JobInstance::waiting_time)),
            deadline_misses: jobs
                .iter()
                .filter(|j| j.met_deadline() == Some(false))
                .count(),
            stats,
        }
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} q={} o={} | makespan {} | completed {}/{} | response {:.2} | turnaround {:.2} | waiting {:.2} | deadline misses {} | preemptions {} | idle {}",
            self.config.algorithm,
            self.config.quantum,
            self.config.overload,
            self.makespan,
            self.completed,
            self.jobs,
            self.avg_response,
            self.avg_turnaround,
            self.avg_waiting,
            self.deadline_misses,
            self.stats.preemptions,
            self.stats.idle_ticks,
        )
    }
}

fn avg(values: impl Iterator<Item = Ticks>) -> f64 {
    values.map(|v| v as f64).collect::<Mean>().mean()
}

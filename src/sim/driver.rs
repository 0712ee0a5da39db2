use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{info, warn};

use super::{
    job::{Job, JobId, JobInstance},
    report::SimReport,
    timeline::Timeline,
};
use crate::{
    config::SchedulerConfig,
    core::{ProcessKey, Scheduler, Ticks},
    error::{SchedError, SchedResult},
};

/// Runs a fixed job set through a [`Scheduler`] and collects per-job results.
pub struct Sim {
    pub core: Scheduler<JobId, Timeline>,
    // Start order; keys[i] is the scheduler task of jobs[i]
    jobs: Vec<Job>,
    keys: Vec<ProcessKey>,
    index: FxHashMap<JobId, usize>,
}

impl Sim {
    pub fn new(config: SchedulerConfig, mut jobs: Vec<Job>) -> SchedResult<Self> {
        jobs.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

        let mut seen = FxHashSet::default();
        if let Some(dup) = jobs.iter().find(|job| !seen.insert(job.id)) {
            return Err(SchedError::DuplicateJob(dup.id));
        }

        let processes = jobs
            .iter()
            .map(Job::to_process)
            .collect::<SchedResult<Vec<_>>>()?;

        let mut core = Scheduler::with_observer(config, Timeline::default())?;
        let keys = core.submit(processes);
        let index = jobs.iter().enumerate().map(|(i, job)| (job.id, i)).collect();

        info!("Simulation created with {} jobs", jobs.len());
        Ok(Self {
            core,
            jobs,
            keys,
            index,
        })
    }

    pub fn step(&mut self) {
        self.core.tick();
        let now = self.core.now();
        self.core.observer_mut().extend_to(now);
    }

    /// Step until every job completed or the clock reaches `max_ticks`.
    pub fn run(&mut self, max_ticks: Ticks) -> SimReport {
        while !self.all_jobs_completed() && self.core.now() < max_ticks {
            self.step();
        }
        if !self.all_jobs_completed() {
            warn!(
                "Simulation stopped at tick limit {} with jobs outstanding",
                max_ticks
            );
        }
        self.report()
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.core.all_finished()
    }

    pub fn job(&self, id: JobId) -> Option<JobInstance> {
        let i = *self.index.get(&id)?;
        self.instance(self.jobs[i], self.keys[i])
    }

    /// Job results in start order.
    pub fn jobs(&self) -> Vec<JobInstance> {
        self.jobs
            .iter()
            .zip(&self.keys)
            .filter_map(|(job, key)| self.instance(*job, *key))
            .collect()
    }

    fn instance(&self, job: Job, key: ProcessKey) -> Option<JobInstance> {
        let task = self.core.task(key)?;
        Some(JobInstance {
            job,
            first_run: task.first_run,
            completion_time: task.completion_time,
            preemptions: task.preemptions,
        })
    }

    pub fn jobs_map<F>(&self, f: F) -> impl Iterator<Item = f64>
    where
        F: Fn(&JobInstance) -> Option<Ticks>,
    {
        self.jobs()
            .into_iter()
            .filter_map(move |job| f(&job))
            .map(|t| t as f64)
    }

    pub fn timeline(&self) -> &Timeline {
        self.core.observer()
    }

    pub fn report(&self) -> SimReport {
        SimReport::new(
            *self.core.config(),
            self.core.now(),
            &self.jobs(),
            *self.core.stats(),
        )
    }
}

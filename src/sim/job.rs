use serde::{Deserialize, Serialize};

use crate::core::{Process, Ticks};
use crate::error::SchedResult;

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub start: Ticks,
    pub duration: Ticks,
    pub deadline: Ticks,
}

impl Job {
    pub fn to_process(&self) -> SchedResult<Process<JobId>> {
        Process::new(self.id, self.start, self.duration, self.deadline)
    }
}

/// A job together with what the scheduler did with it.
///
/// All times are tick numbers. A job can first do work on tick `max(start, 1)`, its arrival
/// tick; work on tick `t` happens before the clock reads `t`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobInstance {
    pub job: Job,
    pub first_run: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub preemptions: u32,
}

impl JobInstance {
    pub fn arrival_tick(&self) -> Ticks {
        self.job.start.max(1)
    }

    /// Ticks spent eligible before the first unit of work.
    pub fn response_time(&self) -> Option<Ticks> {
        self.first_run
            .map(|t| t.saturating_sub(self.arrival_tick()))
    }

    /// Ticks from arrival through completion, inclusive.
    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.completion_time
            .map(|t| (t + 1).saturating_sub(self.arrival_tick()))
    }

    pub fn waiting_time(&self) -> Option<Ticks> {
        self.turnaround_time()
            .map(|t| t.saturating_sub(self.job.duration))
    }

    /// `None` while the job is still incomplete.
    pub fn met_deadline(&self) -> Option<bool> {
        self.completion_time.map(|t| t <= self.job.deadline)
    }
}

use serde::Serialize;
use slotmap::new_key_type;
use std::cmp::Ordering;

use super::observer::Observer;
use crate::error::{SchedError, SchedResult};

pub type Ticks = u64;

new_key_type! {
    /// Handle to a process owned by a `Scheduler`.
    pub struct ProcessKey;
}

/// Progress of a process, derived purely from its elapsed work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProcessState {
    NotStarted,
    Running,
    Finished,
}

/// Where a submitted process currently lives inside the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Ready,
    Executing,
    Finished,
}

/// A unit of scheduled work.
///
/// Timing attributes are fixed at construction; only `elapsed` changes, and only through
/// [`Process::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process<I> {
    id: I,
    start: Ticks,
    duration: Ticks,
    deadline: Ticks,
    elapsed: Ticks,
}

impl<I> Process<I> {
    pub fn new(id: I, start: Ticks, duration: Ticks, deadline: Ticks) -> SchedResult<Self> {
        if duration == 0 {
            return Err(SchedError::ZeroDuration);
        }
        if deadline == 0 {
            return Err(SchedError::ZeroDeadline);
        }
        if deadline <= start {
            return Err(SchedError::DeadlineNotAfterStart { start, deadline });
        }

        Ok(Self {
            id,
            start,
            duration,
            deadline,
            elapsed: 0,
        })
    }

    pub fn id(&self) -> &I {
        &self.id
    }

    pub fn start(&self) -> Ticks {
        self.start
    }

    pub fn duration(&self) -> Ticks {
        self.duration
    }

    pub fn deadline(&self) -> Ticks {
        self.deadline
    }

    pub fn elapsed(&self) -> Ticks {
        self.elapsed
    }

    pub fn remaining(&self) -> Ticks {
        self.duration.saturating_sub(self.elapsed)
    }

    pub fn is_started(&self) -> bool {
        self.elapsed > 0
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn state(&self) -> ProcessState {
        if self.is_finished() {
            ProcessState::Finished
        } else if self.is_started() {
            ProcessState::Running
        } else {
            ProcessState::NotStarted
        }
    }

    /// Perform one tick of work, notifying `observer` of the start, the tick itself and,
    /// on the last unit of work, the finish.
    ///
    /// Must not be called once the process has finished.
    pub fn advance<O>(&mut self, now: Ticks, observer: &mut O)
    where
        O: Observer<I> + ?Sized,
    {
        debug_assert!(!self.is_finished(), "advance() called on a finished process");
        if self.is_finished() {
            return;
        }

        if self.elapsed == 0 {
            observer.on_start(now, self);
        }
        self.elapsed += 1;
        observer.on_tick(now, self);
        if self.elapsed == self.duration {
            observer.on_finish(now, self);
        }
    }
}

/// Scheduler-side bookkeeping for a submitted process.
#[derive(Debug, Clone)]
pub struct Task<I> {
    pub process: Process<I>,
    pub state: TaskState,
    // Position in overall submission order; last-resort tie-break
    pub seq: u64,
    pub first_dispatch: Option<Ticks>,
    // Tick on which the first unit of work ran
    pub first_run: Option<Ticks>,
    // Tick on which the last unit of work ran
    pub completion_time: Option<Ticks>,
    pub dispatches: u32,
    pub preemptions: u32,
}

impl<I> Task<I> {
    pub(crate) fn new(process: Process<I>, seq: u64) -> Self {
        Self {
            process,
            state: TaskState::Pending,
            seq,
            first_dispatch: None,
            first_run: None,
            completion_time: None,
            dispatches: 0,
            preemptions: 0,
        }
    }
}

/// Admission-buffer key. KeyedPriorityQueue is a max-heap, so Ord is flipped to pop the
/// earliest `start` (then earliest submission) first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Arrival {
    pub start: Ticks,
    pub seq: u64,
}

impl PartialOrd for Arrival {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Arrival {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.start, other.seq).cmp(&(self.start, self.seq))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedStats {
    pub dispatches: u64,
    pub preemptions: u64,
    pub completions: u64,
    // Ticks on which no process held the execution slot
    pub idle_ticks: u64,
    pub overload_ticks: u64,
}

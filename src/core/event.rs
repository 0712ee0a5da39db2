use serde::Serialize;

use crate::core::Ticks;

/// A recorded notification, stamped with the clock value at which it fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SchedEvent<I> {
    ProcessStart {
        at: Ticks,
        process: I,
    },
    ProcessTick {
        at: Ticks,
        process: I,
        elapsed: Ticks,
    },
    ProcessFinish {
        at: Ticks,
        process: I,
    },
    EnterReadyQueue {
        at: Ticks,
        process: I,
    },
    EnterExecution {
        at: Ticks,
        process: I,
    },
    // `finished` is false when the process was preempted
    LeaveExecution {
        at: Ticks,
        process: I,
        finished: bool,
    },
}

impl<I> SchedEvent<I> {
    pub fn at(&self) -> Ticks {
        match self {
            Self::ProcessStart { at, .. }
            | Self::ProcessTick { at, .. }
            | Self::ProcessFinish { at, .. }
            | Self::EnterReadyQueue { at, .. }
            | Self::EnterExecution { at, .. }
            | Self::LeaveExecution { at, .. } => *at,
        }
    }

    pub fn process(&self) -> &I {
        match self {
            Self::ProcessStart { process, .. }
            | Self::ProcessTick { process, .. }
            | Self::ProcessFinish { process, .. }
            | Self::EnterReadyQueue { process, .. }
            | Self::EnterExecution { process, .. }
            | Self::LeaveExecution { process, .. } => process,
        }
    }
}

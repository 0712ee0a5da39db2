use thiserror::Error;

use crate::core::Ticks;
use crate::sim::JobId;

pub type SchedResult<T> = Result<T, SchedError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedError {
    #[error("'duration' has to be greater than 0")]
    ZeroDuration,

    #[error("'deadline' has to be greater than 0")]
    ZeroDeadline,

    #[error("'deadline' ({deadline}) has to be greater than 'start' ({start})")]
    DeadlineNotAfterStart { start: Ticks, deadline: Ticks },

    #[error("'quantum' has to be greater than 0")]
    ZeroQuantum,

    #[error("unknown scheduling algorithm '{0}' (expected FIFO, SJF, RR or EDF)")]
    UnknownAlgorithm(String),

    #[error("invalid scheduler config: {0}")]
    InvalidConfig(String),

    #[error("job {0} submitted more than once")]
    DuplicateJob(JobId),
}

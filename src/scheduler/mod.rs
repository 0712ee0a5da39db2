pub mod fifo;
pub mod priq;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::{
    core::{ProcessKey, Task},
    error::SchedError,
};
pub use fifo::FifoQueue;
pub use priq::{PriqQueue, Rank};

/// Scheduling discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// First-in-first-out, runs each process to completion
    #[default]
    Fifo,
    /// Shortest job first, non-preemptive
    Sjf,
    /// Round-robin rotation, preempted when the quantum runs out
    RoundRobin,
    /// Earliest deadline first, preempted when the quantum runs out
    Edf,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Self::Fifo, Self::Sjf, Self::RoundRobin, Self::Edf];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::Sjf => "SJF",
            Self::RoundRobin => "RR",
            Self::Edf => "EDF",
        }
    }

    /// Whether a running process is bounded by the quantum.
    pub const fn is_preemptive(&self) -> bool {
        matches!(self, Self::RoundRobin | Self::Edf)
    }

    pub fn ready_queue(&self) -> ReadyQueue {
        match self {
            Self::Fifo | Self::RoundRobin => ReadyQueue::Fifo(FifoQueue::new()),
            Self::Sjf => ReadyQueue::Priq {
                tasks: PriqQueue::new(),
                by: RankBy::Duration,
            },
            Self::Edf => ReadyQueue::Priq {
                tasks: PriqQueue::new(),
                by: RankBy::Deadline,
            },
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fifo" | "fcfs" => Ok(Self::Fifo),
            "sjf" => Ok(Self::Sjf),
            "rr" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "edf" => Ok(Self::Edf),
            _ => Err(SchedError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl Serialize for Algorithm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Attribute a ranked queue orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    Duration,
    Deadline,
}

/// Algorithm-ordered ready structure. Selection always takes the head.
#[derive(Debug)]
pub enum ReadyQueue {
    Fifo(FifoQueue),
    Priq { tasks: PriqQueue, by: RankBy },
}

impl ReadyQueue {
    pub fn push<I>(&mut self, key: ProcessKey, task: &Task<I>) {
        match self {
            Self::Fifo(tasks) => tasks.push(key),
            Self::Priq { tasks, by } => {
                let process = &task.process;
                let rank = Rank {
                    key: match by {
                        RankBy::Duration => process.duration(),
                        RankBy::Deadline => process.deadline(),
                    },
                    start: process.start(),
                    seq: task.seq,
                };
                tasks.push(key, rank);
            }
        }
    }

    pub fn pop(&mut self) -> Option<ProcessKey> {
        match self {
            Self::Fifo(tasks) => tasks.pop(),
            Self::Priq { tasks, .. } => tasks.pop(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo(tasks) => tasks.len(),
            Self::Priq { tasks, .. } => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: ProcessKey) -> bool {
        match self {
            Self::Fifo(tasks) => tasks.contains(key),
            Self::Priq { tasks, .. } => tasks.contains(key),
        }
    }

    /// Queued keys in selection order.
    pub fn ordered(&self) -> Vec<ProcessKey> {
        match self {
            Self::Fifo(tasks) => tasks.ordered(),
            Self::Priq { tasks, .. } => tasks.ordered(),
        }
    }
}

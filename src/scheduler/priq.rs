use keyed_priority_queue::KeyedPriorityQueue;
use std::cmp::Ordering;

use crate::core::{ProcessKey, Ticks};

/// Ordering key for ranked ready queues: the policy key (duration or deadline), then `start`,
/// then submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub key: Ticks,
    pub start: Ticks,
    pub seq: u64,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Rank's Ord
impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.key, other.start, other.seq).cmp(&(self.key, self.start, self.seq))
    }
}

/// Smallest-rank-first ready queue used by SJF and EDF.
#[derive(Debug)]
pub struct PriqQueue {
    tasks: KeyedPriorityQueue<ProcessKey, Rank>,
}

impl PriqQueue {
    pub fn new() -> Self {
        Self {
            tasks: KeyedPriorityQueue::new(),
        }
    }

    pub fn push(&mut self, task: ProcessKey, rank: Rank) {
        let previous = self.tasks.push(task, rank);
        debug_assert!(previous.is_none(), "Task {task:?} queued twice");
    }

    pub fn pop(&mut self) -> Option<ProcessKey> {
        self.tasks.pop().map(|(task, _)| task)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, task: ProcessKey) -> bool {
        self.tasks.iter().any(|t| *t.0 == task)
    }

    /// Queued tasks in the order they would be popped.
    pub fn ordered(&self) -> Vec<ProcessKey> {
        let mut ranked: Vec<(ProcessKey, Rank)> =
            self.tasks.iter().map(|(task, rank)| (*task, *rank)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().map(|(task, _)| task).collect()
    }
}

impl Default for PriqQueue {
    fn default() -> Self {
        Self::new()
    }
}

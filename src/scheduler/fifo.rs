use std::collections::VecDeque;

use crate::core::ProcessKey;

/// Arrival/rotation-ordered ready queue used by FIFO and RR.
///
/// Newly ready and preempted processes join the tail; selection takes the head.
#[derive(Debug, Default)]
pub struct FifoQueue {
    tasks: VecDeque<ProcessKey>,
}

impl FifoQueue {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    pub fn push(&mut self, task: ProcessKey) {
        self.tasks.push_back(task);
    }

    pub fn pop(&mut self) -> Option<ProcessKey> {
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, task: ProcessKey) -> bool {
        self.tasks.contains(&task)
    }

    pub fn ordered(&self) -> Vec<ProcessKey> {
        self.tasks.iter().copied().collect()
    }
}

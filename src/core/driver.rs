use keyed_priority_queue::KeyedPriorityQueue;
use slotmap::SlotMap;
use std::fmt::Debug;
use tracing::{debug, info, trace};

use super::{
    observer::{NoopObserver, Observer},
    state::{Arrival, Process, ProcessKey, SchedStats, Task, TaskState, Ticks},
};
use crate::{config::SchedulerConfig, error::SchedResult, scheduler::ReadyQueue};

/// Single-slot scheduling engine.
///
/// Processes go pending -> ready -> executing -> finished, possibly bouncing between ready and
/// executing when the algorithm preempts. Time only moves through [`Scheduler::tick`].
pub struct Scheduler<I, O = NoopObserver> {
    config: SchedulerConfig,
    now: Ticks,
    current_quantum: Ticks,
    current_overload: Ticks,
    tasks: SlotMap<ProcessKey, Task<I>>,
    // Admission buffer, earliest start first
    pending: KeyedPriorityQueue<ProcessKey, Arrival>,
    ready: ReadyQueue,
    running: Option<ProcessKey>,
    next_seq: u64,
    stats: SchedStats,
    observer: O,
}

impl<I: Debug> Scheduler<I, NoopObserver> {
    pub fn new(config: SchedulerConfig) -> SchedResult<Self> {
        Self::with_observer(config, NoopObserver)
    }
}

impl<I: Debug, O: Observer<I>> Scheduler<I, O> {
    pub fn with_observer(config: SchedulerConfig, observer: O) -> SchedResult<Self> {
        config.validate()?;
        info!(
            "Scheduler initialized: algorithm={}, quantum={}, overload={}",
            config.algorithm, config.quantum, config.overload
        );

        Ok(Self {
            config,
            now: 0,
            current_quantum: config.quantum,
            current_overload: 0,
            tasks: SlotMap::with_key(),
            pending: KeyedPriorityQueue::new(),
            ready: config.algorithm.ready_queue(),
            running: None,
            next_seq: 0,
            stats: SchedStats::default(),
            observer,
        })
    }

    /// Hand processes over to the scheduler.
    ///
    /// Anything already eligible is admitted, and may be dispatched, before this returns.
    pub fn submit<P>(&mut self, processes: P) -> Vec<ProcessKey>
    where
        P: IntoIterator<Item = Process<I>>,
    {
        let keys = processes
            .into_iter()
            .map(|process| {
                let seq = self.next_seq;
                self.next_seq += 1;
                let arrival = Arrival {
                    start: process.start(),
                    seq,
                };
                trace!(process = ?process.id(), start = arrival.start, "submitted");

                let key = self.tasks.insert(Task::new(process, seq));
                self.pending.push(key, arrival);
                key
            })
            .collect();

        self.sync_queues();
        self.sync_slot();
        keys
    }

    /// Advance the clock by one tick.
    pub fn tick(&mut self) {
        self.now += 1;
        self.sync_queues();
        self.sync_slot();

        match self.running {
            Some(key) => {
                let task = &mut self.tasks[key];
                task.process.advance(self.now, &mut self.observer);
                task.first_run.get_or_insert(self.now);
                trace!(
                    now = self.now,
                    process = ?task.process.id(),
                    elapsed = task.process.elapsed(),
                    "tick"
                );
                if self.config.algorithm.is_preemptive() && self.current_quantum > 0 {
                    self.current_quantum -= 1;
                }
            }
            None => self.stats.idle_ticks += 1,
        }

        if self.current_overload > 0 {
            self.current_overload -= 1;
            self.stats.overload_ticks += 1;
        }

        self.sync_slot();
        self.check_invariants();
    }

    // Move every pending process whose start has been reached into the ready queue.
    // Admission keeps going during an overload window; only dispatch is frozen.
    fn sync_queues(&mut self) {
        while self
            .pending
            .peek()
            .is_some_and(|(_, arrival)| arrival.start <= self.now)
        {
            if let Some((key, _)) = self.pending.pop() {
                self.make_ready(key);
            }
        }
    }

    fn make_ready(&mut self, key: ProcessKey) {
        let task = &mut self.tasks[key];
        task.state = TaskState::Ready;
        self.ready.push(key, task);
        trace!(now = self.now, process = ?task.process.id(), "entered ready queue");
        self.observer.on_enter_ready_queue(self.now, &task.process);
    }

    // Re-evaluate the execution slot until no further transition applies.
    fn sync_slot(&mut self) {
        let preemptive = self.config.algorithm.is_preemptive();

        loop {
            if self.current_overload > 0 {
                return;
            }

            let Some(key) = self.running else {
                if let Some(key) = self.ready.pop() {
                    self.dispatch(key);
                }
                return;
            };

            if self.tasks[key].process.is_finished() {
                self.retire(key);
                if preemptive {
                    self.current_quantum = self.config.quantum;
                }
            } else if preemptive && self.current_quantum == 0 {
                self.preempt(key);
            } else {
                return;
            }
        }
    }

    fn dispatch(&mut self, key: ProcessKey) {
        debug_assert!(self.running.is_none(), "Execution slot already occupied");

        self.running = Some(key);
        self.stats.dispatches += 1;

        let task = &mut self.tasks[key];
        task.state = TaskState::Executing;
        task.dispatches += 1;
        task.first_dispatch.get_or_insert(self.now);

        debug!(now = self.now, process = ?task.process.id(), "dispatched");
        self.observer.on_enter_execution(self.now, &task.process);
    }

    fn retire(&mut self, key: ProcessKey) {
        self.running = None;
        self.stats.completions += 1;

        let task = &mut self.tasks[key];
        task.state = TaskState::Finished;
        task.completion_time = Some(self.now);

        debug!(now = self.now, process = ?task.process.id(), "finished");
        self.observer.on_leave_execution(self.now, &task.process);
    }

    fn preempt(&mut self, key: ProcessKey) {
        self.running = None;
        self.stats.preemptions += 1;

        let task = &mut self.tasks[key];
        task.preemptions += 1;
        debug!(
            now = self.now,
            process = ?task.process.id(),
            remaining = task.process.remaining(),
            "preempted"
        );
        self.observer.on_leave_execution(self.now, &task.process);

        self.make_ready(key);
        self.current_overload = self.config.overload;
        self.current_quantum = self.config.quantum;
    }
}

impl<I, O> Scheduler<I, O> {
    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn running(&self) -> Option<&Process<I>> {
        self.running.map(|key| &self.tasks[key].process)
    }

    pub fn running_key(&self) -> Option<ProcessKey> {
        self.running
    }

    pub fn task(&self, key: ProcessKey) -> Option<&Task<I>> {
        self.tasks.get(key)
    }

    pub fn process(&self, key: ProcessKey) -> Option<&Process<I>> {
        self.tasks.get(key).map(|task| &task.process)
    }

    pub fn tasks(&self) -> impl Iterator<Item = (ProcessKey, &Task<I>)> {
        self.tasks.iter()
    }

    /// Ready processes in the order they would be dispatched.
    pub fn ready_order(&self) -> Vec<&Process<I>> {
        self.ready
            .ordered()
            .into_iter()
            .map(|key| &self.tasks[key].process)
            .collect()
    }

    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn quantum_remaining(&self) -> Ticks {
        self.current_quantum
    }

    pub fn overload_remaining(&self) -> Ticks {
        self.current_overload
    }

    /// Nothing executing, ready or waiting to arrive.
    pub fn is_idle(&self) -> bool {
        self.running.is_none() && self.ready.is_empty() && self.pending.is_empty()
    }

    pub fn all_finished(&self) -> bool {
        self.tasks
            .values()
            .all(|task| task.state == TaskState::Finished)
    }

    pub fn stats(&self) -> &SchedStats {
        &self.stats
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    fn check_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }

        if let Some(key) = self.running {
            let task = &self.tasks[key];
            debug_assert_eq!(
                task.state,
                TaskState::Executing,
                "Slot holder {key:?} must be Executing"
            );
            debug_assert!(
                !task.process.is_finished(),
                "Finished task {key:?} still holds the slot"
            );
        }
        debug_assert!(
            self.running.is_none() || self.current_overload == 0,
            "Slot occupied during an overload window"
        );

        let mut executing = 0;
        for (key, task) in &self.tasks {
            match task.state {
                TaskState::Pending => debug_assert!(
                    self.pending.get_priority(&key).is_some(),
                    "Pending task {key:?} missing from admission buffer"
                ),
                TaskState::Ready => debug_assert!(
                    self.ready.contains(key),
                    "Ready task {key:?} missing from ready queue"
                ),
                TaskState::Executing => {
                    executing += 1;
                    debug_assert_eq!(self.running, Some(key), "Executing task {key:?} not in slot");
                }
                TaskState::Finished => debug_assert!(
                    task.process.is_finished(),
                    "Task {key:?} marked Finished with work remaining"
                ),
            }
            debug_assert!(
                task.process.elapsed() <= task.process.duration(),
                "Task {key:?} overran its duration"
            );
        }
        debug_assert!(executing <= 1, "{executing} tasks executing at once");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::EventLog, scheduler::Algorithm};

    fn proc(id: u32, start: Ticks, duration: Ticks) -> Process<u32> {
        Process::new(id, start, duration, start + duration + 10).unwrap()
    }

    #[test]
    fn submission_dispatches_immediately() {
        let mut sched = Scheduler::new(SchedulerConfig::new(Algorithm::Fifo)).unwrap();
        let keys = sched.submit([proc(1, 0, 2), proc(2, 0, 1)]);

        assert_eq!(sched.now(), 0);
        assert_eq!(sched.running().map(|p| *p.id()), Some(1));
        assert_eq!(sched.ready_len(), 1);
        assert_eq!(sched.task(keys[0]).unwrap().first_dispatch, Some(0));
        assert_eq!(sched.task(keys[1]).unwrap().state, TaskState::Ready);
    }

    #[test]
    fn zero_quantum_fails_construction() {
        let config = SchedulerConfig::new(Algorithm::RoundRobin).with_quantum(0);
        assert!(Scheduler::<u32>::new(config).is_err());
    }

    #[test]
    fn quantum_resets_on_dispatch() {
        let config = SchedulerConfig::new(Algorithm::RoundRobin).with_quantum(3);
        let mut sched = Scheduler::new(config).unwrap();
        sched.submit([proc(1, 0, 2), proc(2, 0, 5)]);

        sched.tick();
        assert_eq!(sched.quantum_remaining(), 2);
        sched.tick();
        // Process 1 finished, process 2 took over with a fresh quantum
        assert_eq!(sched.running().map(|p| *p.id()), Some(2));
        assert_eq!(sched.quantum_remaining(), 3);
    }

    #[test]
    fn non_preemptive_quantum_untouched() {
        let config = SchedulerConfig::new(Algorithm::Sjf).with_quantum(1);
        let mut sched = Scheduler::new(config).unwrap();
        sched.submit([proc(1, 0, 4)]);

        for _ in 0..3 {
            sched.tick();
        }
        assert_eq!(sched.quantum_remaining(), 1);
        assert_eq!(sched.stats().preemptions, 0);
    }

    #[test]
    fn borrowed_observer_keeps_ownership() {
        let mut log = EventLog::new();
        {
            let mut sched =
                Scheduler::with_observer(SchedulerConfig::new(Algorithm::Fifo), &mut log).unwrap();
            sched.submit([proc(1, 0, 1)]);
            sched.tick();
            assert!(sched.all_finished());
            assert!(sched.is_idle());
        }
        assert_eq!(log.for_process(&1).count(), 6);
    }

    #[test]
    fn bookkeeping_tracks_completion() {
        let config = SchedulerConfig::new(Algorithm::RoundRobin)
            .with_quantum(1)
            .with_overload(1);
        let mut sched = Scheduler::new(config).unwrap();
        let keys = sched.submit([proc(1, 0, 2)]);

        // dispatch at 0, run 1, preempt, frozen 2, redispatch at 2, run 3
        for _ in 0..3 {
            sched.tick();
        }

        let task = sched.task(keys[0]).unwrap();
        assert_eq!(task.state, TaskState::Finished);
        assert_eq!(task.completion_time, Some(3));
        assert_eq!(task.dispatches, 2);
        assert_eq!(task.preemptions, 1);
        assert_eq!(
            *sched.stats(),
            SchedStats {
                dispatches: 2,
                preemptions: 1,
                completions: 1,
                idle_ticks: 1,
                overload_ticks: 1,
            }
        );
    }
}

use super::{
    event::SchedEvent,
    state::{Process, Ticks},
};

/// Listener for process and execution-slot transitions.
///
/// Every method defaults to a no-op, so implementors only override what they care about.
/// Notifications fire synchronously from inside `Scheduler::submit` and `Scheduler::tick`.
pub trait Observer<I> {
    /// First unit of work, fired before `on_tick`.
    fn on_start(&mut self, _now: Ticks, _process: &Process<I>) {}

    fn on_tick(&mut self, _now: Ticks, _process: &Process<I>) {}

    /// Last unit of work, fired after `on_tick`.
    fn on_finish(&mut self, _now: Ticks, _process: &Process<I>) {}

    fn on_enter_ready_queue(&mut self, _now: Ticks, _process: &Process<I>) {}

    fn on_enter_execution(&mut self, _now: Ticks, _process: &Process<I>) {}

    fn on_leave_execution(&mut self, _now: Ticks, _process: &Process<I>) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<I> Observer<I> for NoopObserver {}

impl<I, O> Observer<I> for &mut O
where
    O: Observer<I> + ?Sized,
{
    fn on_start(&mut self, now: Ticks, process: &Process<I>) {
        (**self).on_start(now, process);
    }

    fn on_tick(&mut self, now: Ticks, process: &Process<I>) {
        (**self).on_tick(now, process);
    }

    fn on_finish(&mut self, now: Ticks, process: &Process<I>) {
        (**self).on_finish(now, process);
    }

    fn on_enter_ready_queue(&mut self, now: Ticks, process: &Process<I>) {
        (**self).on_enter_ready_queue(now, process);
    }

    fn on_enter_execution(&mut self, now: Ticks, process: &Process<I>) {
        (**self).on_enter_execution(now, process);
    }

    fn on_leave_execution(&mut self, now: Ticks, process: &Process<I>) {
        (**self).on_leave_execution(now, process);
    }
}

/// Observer that records every notification as a [`SchedEvent`].
#[derive(Debug, Clone)]
pub struct EventLog<I> {
    events: Vec<SchedEvent<I>>,
}

impl<I> EventLog<I> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[SchedEvent<I>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drain recorded events, e.g. once per tick for a visualizer.
    pub fn take(&mut self) -> Vec<SchedEvent<I>> {
        std::mem::take(&mut self.events)
    }

    pub fn at(&self, tick: Ticks) -> impl Iterator<Item = &SchedEvent<I>> {
        self.events.iter().filter(move |event| event.at() == tick)
    }
}

impl<I: PartialEq> EventLog<I> {
    pub fn for_process<'a>(&'a self, id: &'a I) -> impl Iterator<Item = &'a SchedEvent<I>> {
        self.events.iter().filter(move |event| event.process() == id)
    }
}

impl<I> Default for EventLog<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone> Observer<I> for EventLog<I> {
    fn on_start(&mut self, now: Ticks, process: &Process<I>) {
        self.events.push(SchedEvent::ProcessStart {
            at: now,
            process: process.id().clone(),
        });
    }

    fn on_tick(&mut self, now: Ticks, process: &Process<I>) {
        self.events.push(SchedEvent::ProcessTick {
            at: now,
            process: process.id().clone(),
            elapsed: process.elapsed(),
        });
    }

    fn on_finish(&mut self, now: Ticks, process: &Process<I>) {
        self.events.push(SchedEvent::ProcessFinish {
            at: now,
            process: process.id().clone(),
        });
    }

    fn on_enter_ready_queue(&mut self, now: Ticks, process: &Process<I>) {
        self.events.push(SchedEvent::EnterReadyQueue {
            at: now,
            process: process.id().clone(),
        });
    }

    fn on_enter_execution(&mut self, now: Ticks, process: &Process<I>) {
        self.events.push(SchedEvent::EnterExecution {
            at: now,
            process: process.id().clone(),
        });
    }

    fn on_leave_execution(&mut self, now: Ticks, process: &Process<I>) {
        self.events.push(SchedEvent::LeaveExecution {
            at: now,
            process: process.id().clone(),
            finished: process.is_finished(),
        });
    }
}

pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::Scheduler;
pub use event::SchedEvent;
pub use observer::{EventLog, NoopObserver, Observer};
pub use state::{Process, ProcessKey, ProcessState, SchedStats, Task, TaskState, Ticks};

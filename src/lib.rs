pub mod config;
pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use config::SchedulerConfig;
pub use crate::core::{EventLog, NoopObserver, Observer, Process, SchedEvent, Scheduler, Ticks};
pub use error::{SchedError, SchedResult};
pub use scheduler::Algorithm;
pub use sim::{Job, Sim, SimReport};

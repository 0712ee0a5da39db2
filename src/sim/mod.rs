pub mod driver;
pub mod job;
pub mod report;
pub mod timeline;

pub use driver::Sim;
pub use job::{Job, JobId, JobInstance};
pub use report::SimReport;
pub use timeline::Timeline;

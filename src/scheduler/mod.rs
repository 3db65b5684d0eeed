mod job;
mod metrics;

pub use job::{Job, JobId, ScheduledJob};
pub use metrics::{Summary, calculate, summarize};

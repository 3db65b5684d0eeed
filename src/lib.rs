//! Shortest-Job-First CPU scheduling metrics with an optional concurrent
//! execution replay.
//!
//! The [`scheduler`] module computes the non-preemptive SJF schedule and its
//! averages; [`simulator`] replays a schedule with one tokio task per job.
//! Everything else is the command-line application around them.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod report;
pub mod scheduler;
pub mod simulator;
pub mod ui;

pub use error::{InputError, SchedulerError};
pub use scheduler::{Job, JobId, ScheduledJob, Summary};
pub use simulator::{ExecutionSimulator, SimEvent, SimulationOutcome};

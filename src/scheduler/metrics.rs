//! Non-preemptive Shortest-Job-First metrics.
//!
//! [`calculate`] orders jobs by burst time and derives waiting, turnaround and
//! completion times on a single resource where every job arrives at time 0.
//! [`summarize`] reduces a schedule to the averages shown in the report.

use serde::{Deserialize, Serialize};

use super::job::{Job, ScheduledJob};
use crate::error::SchedulerError;

/// Aggregate metrics over a computed schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub total_waiting: u64,
    pub total_turnaround: u64,
    pub average_waiting: f64,
    pub average_turnaround: f64,
}

/// Computes the SJF schedule for `jobs`.
///
/// Jobs are stable-sorted by burst, so equal bursts keep their input order.
/// Each job waits for the cumulative burst of everything scheduled before it:
///
/// - `waiting_time = current_time`
/// - `turnaround_time = waiting_time + burst`
/// - `completion_time = waiting_time + burst`
///
/// Fails with [`SchedulerError::EmptyJobSet`] on an empty slice and with
/// [`SchedulerError::InvalidInput`] if any burst is zero.
pub fn calculate(jobs: &[Job]) -> Result<Vec<ScheduledJob>, SchedulerError> {
    if jobs.is_empty() {
        return Err(SchedulerError::EmptyJobSet);
    }
    if let Some(job) = jobs.iter().find(|j| j.burst == 0) {
        return Err(SchedulerError::InvalidInput {
            id: job.id,
            reason: "burst time must be positive".into(),
        });
    }

    let mut ordered = jobs.to_vec();
    // `sort_by_key` is stable.
    ordered.sort_by_key(|j| j.burst);

    let mut current_time: u64 = 0;
    let mut scheduled = Vec::with_capacity(ordered.len());
    for job in ordered {
        let waiting_time = current_time;
        let completion_time =
            waiting_time
                .checked_add(job.burst)
                .ok_or_else(|| SchedulerError::InvalidInput {
                    id: job.id,
                    reason: "cumulative burst time overflows".into(),
                })?;

        scheduled.push(ScheduledJob {
            id: job.id,
            burst: job.burst,
            waiting_time,
            turnaround_time: completion_time,
            completion_time,
        });
        current_time = completion_time;
    }

    tracing::debug!(jobs = scheduled.len(), makespan = current_time, "computed SJF schedule");
    Ok(scheduled)
}

/// Totals and averages over a computed schedule.
pub fn summarize(scheduled: &[ScheduledJob]) -> Result<Summary, SchedulerError> {
    if scheduled.is_empty() {
        return Err(SchedulerError::EmptyJobSet);
    }

    let count = scheduled.len();
    let total_waiting = checked_total(scheduled, |j| j.waiting_time)?;
    let total_turnaround = checked_total(scheduled, |j| j.turnaround_time)?;

    Ok(Summary {
        count,
        total_waiting,
        total_turnaround,
        average_waiting: total_waiting as f64 / count as f64,
        average_turnaround: total_turnaround as f64 / count as f64,
    })
}

fn checked_total(
    scheduled: &[ScheduledJob],
    field: impl Fn(&ScheduledJob) -> u64,
) -> Result<u64, SchedulerError> {
    scheduled.iter().try_fold(0u64, |total, job| {
        total
            .checked_add(field(job))
            .ok_or_else(|| SchedulerError::InvalidInput {
                id: job.id,
                reason: "total time overflows".into(),
            })
    })
}

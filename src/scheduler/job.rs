use serde::{Deserialize, Serialize};

pub type JobId = u32;

/// A process as supplied by the process source: an id assigned by input
/// order and the CPU units it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub burst: u64,
}

impl Job {
    pub fn new(id: JobId, burst: u64) -> Self {
        Self { id, burst }
    }

    /// Builds jobs with ids `1..=n` in the order the bursts are given.
    pub fn from_bursts(bursts: &[u64]) -> Vec<Job> {
        bursts
            .iter()
            .enumerate()
            .map(|(i, &burst)| Job::new((i + 1) as JobId, burst))
            .collect()
    }
}

/// A job annotated with its SJF metrics. Produced once by
/// [`calculate`](super::calculate) and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub id: JobId,
    pub burst: u64,
    pub waiting_time: u64,
    pub turnaround_time: u64,
    pub completion_time: u64,
}

impl ScheduledJob {
    /// The input job this record was derived from.
    pub fn job(&self) -> Job {
        Job::new(self.id, self.burst)
    }

    /// Label used for the simulation worker running this job.
    pub fn worker_name(&self) -> String {
        format!("P{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bursts_assigns_ids_in_input_order() {
        let jobs = Job::from_bursts(&[6, 8, 7]);
        assert_eq!(
            jobs,
            vec![Job::new(1, 6), Job::new(2, 8), Job::new(3, 7)]
        );
    }

    #[test]
    fn scheduled_job_recovers_input_job() {
        let scheduled = ScheduledJob {
            id: 4,
            burst: 3,
            waiting_time: 0,
            turnaround_time: 3,
            completion_time: 3,
        };
        assert_eq!(scheduled.job(), Job::new(4, 3));
        assert_eq!(scheduled.worker_name(), "P4");
    }

    #[test]
    fn scheduled_job_serializes_snake_case_fields() {
        let scheduled = ScheduledJob {
            id: 1,
            burst: 5,
            waiting_time: 0,
            turnaround_time: 5,
            completion_time: 5,
        };
        let json = serde_json::to_value(scheduled).unwrap();
        assert_eq!(json["waiting_time"], 0);
        assert_eq!(json["turnaround_time"], 5);
    }
}

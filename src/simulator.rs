//! Concurrent replay of a computed schedule.
//!
//! [`ExecutionSimulator`] launches one tokio task per job, all at once, each
//! sleeping `burst * speed`. Workers never share state: they report
//! [`SimEvent`]s over an unbounded channel to a single collector, which owns the
//! completion order and forwards every event to the caller's observer. The
//! simulator returns only after every launched worker has been joined.
//!
//! This replays jobs in parallel rather than queued, so the completion order
//! is whatever real time produces. It is a visualization, not part of the
//! schedule.

use std::future::{self, Future};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep};

use crate::error::SchedulerError;
use crate::scheduler::{JobId, ScheduledJob};

/// Worker capacity used when none is configured.
pub const DEFAULT_MAX_WORKERS: usize = 64;

/// Progress reported by a simulation worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Started {
        id: JobId,
        burst: u64,
        worker: String,
    },
    Completed {
        id: JobId,
        worker: String,
    },
}

/// What a finished simulation observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Job ids in the order their workers finished.
    pub completion_order: Vec<JobId>,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct ExecutionSimulator {
    speed: Duration,
    max_workers: usize,
}

impl ExecutionSimulator {
    /// Creates a simulator that sleeps `speed` per burst unit.
    pub fn new(speed: Duration) -> Result<Self, SchedulerError> {
        if speed.is_zero() {
            return Err(SchedulerError::InvalidSpeed(0.0));
        }
        Ok(Self {
            speed,
            max_workers: DEFAULT_MAX_WORKERS,
        })
    }

    /// Creates a simulator from seconds per burst unit, rejecting
    /// non-finite or non-positive values.
    pub fn from_secs_f64(secs: f64) -> Result<Self, SchedulerError> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(SchedulerError::InvalidSpeed(secs));
        }
        let speed =
            Duration::try_from_secs_f64(secs).map_err(|_| SchedulerError::InvalidSpeed(secs))?;
        Self::new(speed)
    }

    /// Caps how many workers may be launched. Launching past the cap fails
    /// with [`SchedulerError::SimulationLaunch`].
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    fn delay_for(&self, burst: u64) -> Duration {
        Duration::try_from_secs_f64(self.speed.as_secs_f64() * burst as f64)
            .unwrap_or(Duration::MAX)
    }

    /// Replays `jobs` until every worker finishes.
    pub async fn run(
        &self,
        jobs: &[ScheduledJob],
        observer: impl FnMut(&SimEvent),
    ) -> Result<SimulationOutcome, SchedulerError> {
        self.run_until(jobs, observer, future::pending::<()>()).await
    }

    /// Replays `jobs`, aborting every worker once `shutdown` resolves.
    ///
    /// On shutdown the aborted workers are still joined before this returns
    /// [`SchedulerError::Interrupted`] with the number of completions seen.
    pub async fn run_until<F>(
        &self,
        jobs: &[ScheduledJob],
        mut observer: impl FnMut(&SimEvent),
        shutdown: F,
    ) -> Result<SimulationOutcome, SchedulerError>
    where
        F: Future<Output = ()>,
    {
        if jobs.is_empty() {
            return Err(SchedulerError::EmptyJobSet);
        }

        let started = Instant::now();
        let (tx, mut rx) = mpsc::unbounded_channel::<SimEvent>();
        let mut workers = JoinSet::new();
        let mut launched = 0usize;

        for job in jobs {
            if launched >= self.max_workers {
                tracing::warn!(
                    launched,
                    max_workers = self.max_workers,
                    "worker capacity exhausted"
                );
                break;
            }

            let tx = tx.clone();
            let job = *job;
            let delay = self.delay_for(job.burst);
            workers.spawn(async move {
                let worker = job.worker_name();
                // The collector outlives every worker, so sends only fail
                // after an abort, when nobody is listening anyway.
                let _ = tx.send(SimEvent::Started {
                    id: job.id,
                    burst: job.burst,
                    worker: worker.clone(),
                });
                sleep(delay).await;
                let _ = tx.send(SimEvent::Completed { id: job.id, worker });
            });
            launched += 1;
        }
        drop(tx);
        tracing::debug!(launched, total = jobs.len(), "simulation workers launched");

        let mut completion_order = Vec::with_capacity(launched);
        let mut interrupted = false;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => {
                        if let SimEvent::Completed { id, .. } = &event {
                            completion_order.push(*id);
                        }
                        observer(&event);
                    }
                    // Every sender is gone: all workers finished or were aborted.
                    None => break,
                },
                _ = &mut shutdown, if !interrupted => {
                    tracing::info!(completed = completion_order.len(), "simulation interrupted");
                    interrupted = true;
                    workers.abort_all();
                }
            }
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                if err.is_panic() {
                    std::panic::resume_unwind(err.into_panic());
                }
            }
        }

        let completed = completion_order.len();
        if interrupted {
            return Err(SchedulerError::Interrupted { completed });
        }
        if launched < jobs.len() {
            return Err(SchedulerError::SimulationLaunch {
                launched,
                not_launched: jobs.len() - launched,
                completed,
            });
        }

        Ok(SimulationOutcome {
            completion_order,
            elapsed: started.elapsed(),
        })
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{Job, calculate};

    fn schedule(bursts: &[u64]) -> Vec<ScheduledJob> {
        calculate(&Job::from_bursts(bursts)).unwrap()
    }

    fn fast() -> ExecutionSimulator {
        ExecutionSimulator::new(Duration::from_millis(1)).unwrap()
    }

    #[tokio::test]
    async fn every_worker_completes_exactly_once_across_trials() {
        let sim = fast();
        for trial in 0..100u64 {
            let n = (trial % 7 + 1) as usize;
            let bursts: Vec<u64> = (0..n as u64).map(|i| (trial + i * 3) % 4 + 1).collect();
            let jobs = schedule(&bursts);

            let outcome = sim.run(&jobs, |_| {}).await.unwrap();

            let mut seen = outcome.completion_order.clone();
            seen.sort_unstable();
            let expected: Vec<JobId> = (1..=n as JobId).collect();
            assert_eq!(seen, expected, "trial {trial}");
        }
    }

    #[tokio::test]
    async fn observer_sees_start_and_completion_for_each_job() {
        let jobs = schedule(&[3, 1, 2]);
        let mut events = Vec::new();
        fast().run(&jobs, |e| events.push(e.clone())).await.unwrap();

        let started = events
            .iter()
            .filter(|e| matches!(e, SimEvent::Started { .. }))
            .count();
        let completed = events
            .iter()
            .filter(|e| matches!(e, SimEvent::Completed { .. }))
            .count();
        assert_eq!(started, 3);
        assert_eq!(completed, 3);
        assert!(events.contains(&SimEvent::Started {
            id: 1,
            burst: 3,
            worker: "P1".into(),
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn shorter_bursts_finish_first_without_jitter() {
        let sim = ExecutionSimulator::from_secs_f64(0.2).unwrap();
        let jobs = schedule(&[6, 8, 7, 3]);

        let outcome = sim.run(&jobs, |_| {}).await.unwrap();

        assert_eq!(outcome.completion_order, vec![4, 1, 3, 2]);
        assert!(outcome.elapsed >= Duration::from_millis(1600));
    }

    #[tokio::test]
    async fn simulation_leaves_metrics_untouched() {
        let jobs = schedule(&[6, 8, 7, 3]);
        let before = jobs.clone();
        fast().run(&jobs, |_| {}).await.unwrap();
        assert_eq!(jobs, before);
    }

    #[tokio::test]
    async fn launch_failure_joins_launched_workers_first() {
        let sim = fast().with_max_workers(2);
        let jobs = schedule(&[5, 4, 3, 2, 1]);
        let mut completed_events = 0;

        let err = sim
            .run(&jobs, |e| {
                if matches!(e, SimEvent::Completed { .. }) {
                    completed_events += 1;
                }
            })
            .await
            .unwrap_err();

        match err {
            SchedulerError::SimulationLaunch {
                launched,
                not_launched,
                completed,
            } => {
                assert_eq!(launched, 2);
                assert_eq!(not_launched, 3);
                assert_eq!(completed, 2);
            }
            other => panic!("expected SimulationLaunch, got {other:?}"),
        }
        assert_eq!(completed_events, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_and_reports_partial_progress() {
        let sim = ExecutionSimulator::from_secs_f64(1.0).unwrap();
        let jobs = schedule(&[1, 50, 60]);

        let err = sim
            .run_until(&jobs, |_| {}, sleep(Duration::from_secs(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulerError::Interrupted { completed: 1 }));
    }

    #[tokio::test]
    async fn empty_job_set_is_rejected() {
        let err = fast().run(&[], |_| {}).await.unwrap_err();
        assert!(matches!(err, SchedulerError::EmptyJobSet));
    }

    #[test]
    fn speed_must_be_positive_and_finite() {
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ExecutionSimulator::from_secs_f64(bad),
                Err(SchedulerError::InvalidSpeed(_))
            ));
        }
        assert!(ExecutionSimulator::new(Duration::ZERO).is_err());
        let sim = ExecutionSimulator::from_secs_f64(0.25).unwrap();
        assert_eq!(sim.speed(), Duration::from_millis(250));
        assert_eq!(sim.delay_for(4), Duration::from_secs(1));
    }

    #[test]
    fn outcome_serializes_elapsed_as_millis() {
        let outcome = SimulationOutcome {
            completion_order: vec![2, 1],
            elapsed: Duration::from_millis(1500),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["elapsed"], 1500);
        assert_eq!(json["completion_order"], serde_json::json!([2, 1]));
    }
}

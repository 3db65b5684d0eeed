use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scheduler::{ScheduledJob, Summary};
use crate::simulator::SimulationOutcome;

/// Everything one run produced, in a form that serializes to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub jobs: Vec<ScheduledJob>,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationOutcome>,
}

impl RunReport {
    pub fn new(jobs: Vec<ScheduledJob>, summary: Summary) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            jobs,
            summary,
            simulation: None,
        }
    }

    pub fn with_simulation(mut self, outcome: SimulationOutcome) -> Self {
        self.simulation = Some(outcome);
        self
    }
}

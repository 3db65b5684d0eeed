use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Invalid input for process {id}: {reason}")]
    InvalidInput { id: u32, reason: String },

    #[error("No processes to schedule")]
    EmptyJobSet,

    #[error("Execution speed must be a positive number of seconds, got {0}")]
    InvalidSpeed(f64),

    #[error(
        "Failed to launch simulation worker: {launched} launched, {not_launched} not launched, {completed} completed"
    )]
    SimulationLaunch {
        launched: usize,
        not_launched: usize,
        completed: usize,
    },

    #[error("Interrupted after {completed} completed processes")]
    Interrupted { completed: usize },
}

impl SchedulerError {
    /// Interrupts end the program cleanly instead of being reported as failures.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, SchedulerError::Interrupted { .. })
    }
}

/// Rejections produced while reading burst times. These never reach the
/// calculator: the process source re-prompts on every variant except `Eof`.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid input '{0}'. Must be a positive integer")]
    NotANumber(String),

    #[error("{0} is not positive. Must be a positive integer")]
    NotPositive(i128),

    #[error("Input closed")]
    Eof,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_display() {
        let err = SchedulerError::InvalidInput {
            id: 3,
            reason: "burst time must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid input for process 3: burst time must be positive"
        );
    }

    #[test]
    fn launch_error_reports_counts() {
        let err = SchedulerError::SimulationLaunch {
            launched: 2,
            not_launched: 3,
            completed: 2,
        };
        assert_eq!(
            err.to_string(),
            "Failed to launch simulation worker: 2 launched, 3 not launched, 2 completed"
        );
    }

    #[test]
    fn only_interrupted_is_interrupt() {
        assert!(SchedulerError::Interrupted { completed: 0 }.is_interrupt());
        assert!(!SchedulerError::EmptyJobSet.is_interrupt());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchedulerError>();
        assert_send_sync::<InputError>();
    }
}

//! Job engine error types.

use thiserror::Error;

/// Errors raised by the registry, scheduler and executor.
#[derive(Debug, Error)]
pub enum JobError {
    /// A job spec has neither or both of `command` and `run`.
    #[error("Invalid job #{index} '{name}': {reason}")]
    InvalidDefinition {
        index: usize,
        name: String,
        reason: String,
    },

    /// A job's cron expression could not be parsed.
    #[error("Invalid schedule for job #{index} '{name}' ({expression}): {reason}")]
    InvalidSchedule {
        index: usize,
        name: String,
        expression: String,
        reason: String,
    },

    /// No job registered at this index.
    #[error("Job not found: {0}")]
    NotFound(usize),
}

impl JobError {
    /// Whether this error comes from bad configuration and must stop startup.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            JobError::InvalidDefinition { .. } | JobError::InvalidSchedule { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_schedule_names_job() {
        let err = JobError::InvalidSchedule {
            index: 2,
            name: "Nightly".to_string(),
            expression: "0 25 * * *".to_string(),
            reason: "hour out of range".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("#2"));
        assert!(display.contains("Nightly"));
        assert!(display.contains("0 25 * * *"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_not_found_is_not_config_error() {
        let err = JobError::NotFound(7);
        assert!(err.to_string().contains('7'));
        assert!(!err.is_config_error());
    }
}

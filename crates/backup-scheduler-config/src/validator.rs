//! Configuration validation.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a `ConfigError`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
///
/// Job actions and cron expressions are checked when the job registry and
/// scheduler are built; this covers everything around them.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_rclone(config, &mut result);
        Self::validate_jobs(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.trim().is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_rclone(config: &Config, result: &mut ValidationResult) {
        if config.rclone.binary.trim().is_empty() {
            result.add_error(ValidationError::new(
                "rclone.binary",
                "rclone binary cannot be empty",
            ));
        }

        if let Some(idx) = config
            .rclone
            .extra_args
            .iter()
            .position(|arg| arg.trim().is_empty())
        {
            result.add_error(ValidationError::new(
                format!("rclone.extra_args[{}]", idx),
                "Argument cannot be blank",
            ));
        }
    }

    fn validate_jobs(config: &Config, result: &mut ValidationResult) {
        if config.jobs.is_empty() {
            result.add_warning(ValidationWarning::new("jobs", "No jobs configured"));
            return;
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (idx, job) in config.jobs.iter().enumerate() {
            let name = job.name.trim();
            if name.is_empty() {
                result.add_warning(ValidationWarning::new(
                    format!("jobs[{}].name", idx),
                    "Job has no name, it will be shown by index",
                ));
                continue;
            }

            if let Some(first) = seen.insert(name, idx) {
                result.add_warning(ValidationWarning::new(
                    format!("jobs[{}].name", idx),
                    format!("Duplicate job name '{}' (also jobs[{}])", name, first),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

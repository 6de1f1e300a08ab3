//! Job registry built once from configuration.

use backup_scheduler_config::JobSpec;
use tracing::debug;

use crate::definition::{JobAction, JobDefinition, ShellCommand, SyncCommand};
use crate::error::JobError;

/// Ordered, immutable list of jobs. A job's index is its position.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Vec<JobDefinition>,
}

impl JobRegistry {
    /// Build the registry from raw specs, in order.
    ///
    /// Fails on the first spec that has neither or both of an rclone command
    /// and a shell command. Blank values count as absent.
    pub fn load(specs: &[JobSpec]) -> Result<Self, JobError> {
        let jobs = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| Self::definition(index, spec))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} job(s) into registry", jobs.len());
        Ok(Self { jobs })
    }

    fn definition(index: usize, spec: &JobSpec) -> Result<JobDefinition, JobError> {
        let sync = spec
            .command
            .as_ref()
            .map(|c| c.to_args())
            .filter(|args| !args.is_empty());
        let shell = spec
            .run
            .as_deref()
            .map(str::trim)
            .filter(|line| !line.is_empty());

        let action = match (sync, shell) {
            (Some(args), None) => JobAction::Sync(SyncCommand::new(args)),
            (None, Some(line)) => JobAction::Shell(ShellCommand::new(line)),
            (Some(_), Some(_)) => {
                return Err(JobError::InvalidDefinition {
                    index,
                    name: spec.name.clone(),
                    reason: "both 'command' and 'run' are set".to_string(),
                });
            }
            (None, None) => {
                return Err(JobError::InvalidDefinition {
                    index,
                    name: spec.name.clone(),
                    reason: "one of 'command' or 'run' is required".to_string(),
                });
            }
        };

        let schedule = spec
            .schedule
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(JobDefinition {
            index,
            name: spec.name.clone(),
            schedule,
            action,
        })
    }

    pub fn list(&self) -> &[JobDefinition] {
        &self.jobs
    }

    pub fn get(&self, index: usize) -> Result<&JobDefinition, JobError> {
        self.jobs.get(index).ok_or(JobError::NotFound(index))
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

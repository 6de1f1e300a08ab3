//! Shared scheduler state.

use std::sync::Arc;

use backup_scheduler_config::Config;

use crate::error::JobError;
use crate::executor::{Executor, ExecutorConfig, TriggerResult};
use crate::registry::JobRegistry;
use crate::scheduler::Scheduler;

/// Registry and executor, built once at startup and handed to both the
/// scheduler and the control API.
#[derive(Clone)]
pub struct SchedulerState {
    registry: Arc<JobRegistry>,
    executor: Executor,
}

impl SchedulerState {
    pub fn new(registry: Arc<JobRegistry>, config: ExecutorConfig) -> Self {
        let executor = Executor::new(registry.clone(), config);
        Self { registry, executor }
    }

    /// Build the registry and parse every schedule from `config`.
    ///
    /// Any invalid job or cron expression fails here, before anything is
    /// started.
    pub fn from_config(config: &Config) -> Result<(Self, Scheduler), JobError> {
        let registry = Arc::new(JobRegistry::load(&config.jobs)?);
        let scheduler = Scheduler::from_registry(&registry)?;
        let state = Self::new(registry, ExecutorConfig::from(&config.rclone));
        Ok((state, scheduler))
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn trigger(&self, index: usize) -> Result<TriggerResult, JobError> {
        self.executor.trigger(index)
    }
}

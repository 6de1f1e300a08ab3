//! Cron scheduler: one timer task per scheduled job.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};
use tracing::{debug, error, info};

use crate::error::JobError;
use crate::executor::{JobTrigger, TriggerResult};
use crate::registry::JobRegistry;
use crate::schedule::ScheduleHandle;

struct ScheduledJob {
    index: usize,
    name: String,
    handle: ScheduleHandle,
}

/// Parsed schedules for every job that has one.
pub struct Scheduler {
    jobs: Vec<ScheduledJob>,
}

impl Scheduler {
    /// Parse the schedule of every scheduled job in the registry.
    ///
    /// The first unparsable expression aborts with an error naming the job.
    /// Jobs without a schedule are left out.
    pub fn from_registry(registry: &JobRegistry) -> Result<Self, JobError> {
        let mut jobs = Vec::new();
        for job in registry.list() {
            let Some(expression) = job.schedule.as_deref() else {
                continue;
            };
            let handle =
                ScheduleHandle::parse(expression).map_err(|e| JobError::InvalidSchedule {
                    index: job.index,
                    name: job.name.clone(),
                    expression: expression.to_string(),
                    reason: e.to_string(),
                })?;
            jobs.push(ScheduledJob {
                index: job.index,
                name: job.display_name(),
                handle,
            });
        }

        Ok(Self { jobs })
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Schedule handle of the job at `index`, if it is scheduled.
    pub fn handle(&self, index: usize) -> Option<&ScheduleHandle> {
        self.jobs
            .iter()
            .find(|j| j.index == index)
            .map(|j| &j.handle)
    }

    /// Spawn one timer task per scheduled job.
    ///
    /// Tasks run until `shutdown` changes or its sender is dropped.
    pub fn start(
        self,
        trigger: Arc<dyn JobTrigger>,
        shutdown: watch::Receiver<bool>,
    ) -> Vec<JoinHandle<()>> {
        info!("Job scheduler started ({} scheduled job(s))", self.jobs.len());

        self.jobs
            .into_iter()
            .map(|job| tokio::spawn(run_timer(job, trigger.clone(), shutdown.clone())))
            .collect()
    }
}

async fn run_timer(
    job: ScheduledJob,
    trigger: Arc<dyn JobTrigger>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut cursor = Local::now();

    loop {
        let Some(next) = job.handle.next_after(&cursor) else {
            info!(job = %job.name, "Schedule '{}' has no further fire times", job.handle.expression());
            return;
        };
        let wait = (next - Local::now()).to_std().unwrap_or(Duration::ZERO);
        debug!(job = %job.name, "Next run at {}", next.to_rfc3339());

        tokio::select! {
            _ = time::sleep(wait) => {}
            _ = shutdown.changed() => {
                debug!(job = %job.name, "Timer stopped");
                return;
            }
        }

        fire(&job, trigger.as_ref());

        // Instants missed while we were late are skipped, not replayed.
        cursor = next.max(Local::now());
    }
}

fn fire(job: &ScheduledJob, trigger: &dyn JobTrigger) {
    match trigger.trigger(job.index) {
        Ok(TriggerResult::Accepted) => {
            info!(job = %job.name, "Scheduled run started");
        }
        Ok(TriggerResult::Busy) => {
            info!(job = %job.name, "Previous run still in progress, skipping scheduled run");
        }
        Err(e) => {
            error!(job = %job.name, "Scheduled trigger failed: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

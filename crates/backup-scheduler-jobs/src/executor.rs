//! Job execution.
//!
//! [`Executor::trigger`] is the single entry point for starting a run, used
//! by both the cron scheduler and the control API. Each job index owns one
//! atomic "running" flag; a trigger that finds it already set is answered
//! with [`TriggerResult::Busy`] and dropped. Accepted runs execute on their
//! own Tokio task and the flag is released by [`RunGuard`] when that task
//! ends, whatever the outcome.

use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use backup_scheduler_config::RcloneConfig;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::definition::{JobAction, JobDefinition};
use crate::error::JobError;
use crate::registry::JobRegistry;

/// How external processes are launched.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub rclone_binary: String,
    pub rclone_config: Option<String>,
    pub rclone_extra_args: Vec<String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::from(&RcloneConfig::default())
    }
}

impl From<&RcloneConfig> for ExecutorConfig {
    fn from(config: &RcloneConfig) -> Self {
        Self {
            rclone_binary: config.binary.clone(),
            rclone_config: config.config_file.clone(),
            rclone_extra_args: config.extra_args.clone(),
        }
    }
}

/// Answer to a trigger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResult {
    /// A new run was started.
    Accepted,
    /// A run of this job is already in flight; the request was dropped.
    Busy,
}

/// How a single run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    /// Non-zero exit. `code` is `None` when the process was killed by a signal.
    Failed { code: Option<i32> },
    /// The process could not be started at all.
    SpawnFailed(String),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded)
    }
}

/// Something that can start a job by index.
pub trait JobTrigger: Send + Sync {
    fn trigger(&self, index: usize) -> Result<TriggerResult, JobError>;
}

struct RunState {
    index: usize,
    running: AtomicBool,
}

struct ExecutorInner {
    registry: Arc<JobRegistry>,
    config: ExecutorConfig,
    states: Vec<RunState>,
}

/// Runs job actions as child processes. Cheap to clone.
#[derive(Clone)]
pub struct Executor {
    inner: Arc<ExecutorInner>,
}

impl Executor {
    /// Create an executor with one run flag per registered job.
    pub fn new(registry: Arc<JobRegistry>, config: ExecutorConfig) -> Self {
        let states = (0..registry.len())
            .map(|index| RunState {
                index,
                running: AtomicBool::new(false),
            })
            .collect();

        Self {
            inner: Arc::new(ExecutorInner {
                registry,
                config,
                states,
            }),
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.inner.registry
    }

    /// Start a run of the job at `index` unless one is already in flight.
    ///
    /// Returns as soon as the decision is made; the process runs on a spawned
    /// task. Must be called from within a Tokio runtime.
    pub fn trigger(&self, index: usize) -> Result<TriggerResult, JobError> {
        let job = self.inner.registry.get(index)?.clone();
        let state = self
            .inner
            .states
            .get(index)
            .ok_or(JobError::NotFound(index))?;

        if state
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(job = %job.display_name(), "Job already running, trigger dropped");
            return Ok(TriggerResult::Busy);
        }

        let guard = RunGuard {
            inner: self.inner.clone(),
            index: state.index,
        };
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let _guard = guard;
            inner.run_action(&job).await;
        });

        Ok(TriggerResult::Accepted)
    }

    /// Whether a run of the job at `index` is in flight.
    pub fn is_running(&self, index: usize) -> bool {
        self.inner
            .states
            .get(index)
            .is_some_and(|s| s.running.load(Ordering::Acquire))
    }

    /// Run a job's action to completion without touching its run flag.
    pub async fn run_action(&self, job: &JobDefinition) -> RunOutcome {
        self.inner.run_action(job).await
    }
}

impl JobTrigger for Executor {
    fn trigger(&self, index: usize) -> Result<TriggerResult, JobError> {
        Executor::trigger(self, index)
    }
}

impl ExecutorInner {
    fn command_for(&self, action: &JobAction) -> Command {
        match action {
            JobAction::Sync(sync) => {
                let mut cmd = Command::new(&self.config.rclone_binary);
                if let Some(config_file) = &self.config.rclone_config {
                    cmd.arg("--config").arg(config_file);
                }
                cmd.args(&self.config.rclone_extra_args).args(&sync.args);
                cmd
            }
            JobAction::Shell(shell) => {
                let (program, flag) = if cfg!(target_os = "windows") {
                    ("cmd", "/C")
                } else {
                    ("sh", "-c")
                };
                let mut cmd = Command::new(program);
                cmd.arg(flag).arg(&shell.line);
                cmd
            }
        }
    }

    async fn run_action(&self, job: &JobDefinition) -> RunOutcome {
        let name = job.display_name();
        let mut cmd = self.command_for(&job.action);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        info!(job = %name, index = job.index, "Starting job ({}): {}", job.action.kind(), describe(&job.action));

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(job = %name, index = job.index, "Job failed to start: {}", e);
                return RunOutcome::SpawnFailed(e.to_string());
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (_, _, status) = tokio::join!(
            forward_lines(stdout, &name, "stdout"),
            forward_lines(stderr, &name, "stderr"),
            child.wait(),
        );

        match status {
            Ok(status) if status.success() => {
                info!(job = %name, index = job.index, "Job completed successfully");
                RunOutcome::Succeeded
            }
            Ok(status) => {
                error!(job = %name, index = job.index, code = ?status.code(), "Job failed: {}", status);
                RunOutcome::Failed {
                    code: status.code(),
                }
            }
            Err(e) => {
                error!(job = %name, index = job.index, "Failed to wait for job process: {}", e);
                RunOutcome::Failed { code: None }
            }
        }
    }
}

/// Clears a job's running flag when the run task ends.
struct RunGuard {
    inner: Arc<ExecutorInner>,
    index: usize,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if let Some(state) = self.inner.states.get(self.index) {
            state.running.store(false, Ordering::Release);
        }
    }
}

fn describe(action: &JobAction) -> String {
    match action {
        JobAction::Sync(sync) => format!("rclone {}", sync),
        JobAction::Shell(shell) => shell.to_string(),
    }
}

/// Longest line logged as one event; longer output is split.
const MAX_LINE_BYTES: usize = 8 * 1024;

/// Log every line from a child's output stream. Returns the number of lines.
///
/// Lines end at `\n` or `\r`, so progress output that redraws one line
/// with carriage returns is logged as it is drawn. Each line becomes one
/// log event, so output from concurrent jobs never interleaves within a
/// line. Empty lines are dropped.
async fn forward_lines<R>(reader: Option<R>, job: &str, stream: &'static str) -> usize
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return 0;
    };

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(256);
    let mut count = 0;
    let mut emit = |buf: &mut Vec<u8>| {
        if !buf.is_empty() {
            info!(job = %job, stream, "{}", String::from_utf8_lossy(buf));
            count += 1;
            buf.clear();
        }
    };

    loop {
        let (used, line_done) = match reader.fill_buf().await {
            Ok([]) => break,
            Ok(chunk) => {
                let limit = chunk.len().min(MAX_LINE_BYTES - buf.len());
                match chunk[..limit].iter().position(|b| matches!(b, b'\n' | b'\r')) {
                    Some(i) => {
                        buf.extend_from_slice(&chunk[..i]);
                        (i + 1, true)
                    }
                    None => {
                        buf.extend_from_slice(&chunk[..limit]);
                        (limit, buf.len() >= MAX_LINE_BYTES)
                    }
                }
            }
            Err(e) => {
                warn!(job = %job, stream, "Stopped reading job output: {}", e);
                break;
            }
        };
        reader.consume(used);
        if line_done {
            emit(&mut buf);
        }
    }
    emit(&mut buf);

    count
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;

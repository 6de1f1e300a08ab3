//! Job definitions.

use std::fmt;

/// Arguments passed to the rclone binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCommand {
    pub args: Vec<String>,
}

impl SyncCommand {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }
}

impl fmt::Display for SyncCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args.join(" "))
    }
}

/// A raw command line run through the platform shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub line: String,
}

impl ShellCommand {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// What a job does when it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobAction {
    Sync(SyncCommand),
    Shell(ShellCommand),
}

impl JobAction {
    /// Short type tag used by the control API.
    pub fn kind(&self) -> &'static str {
        match self {
            JobAction::Sync(_) => "rclone",
            JobAction::Shell(_) => "run",
        }
    }
}

/// A registered job. Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    /// Position in the config; the only external handle for the job.
    pub index: usize,
    pub name: String,
    /// Cron expression; `None` means the job only runs on demand.
    pub schedule: Option<String>,
    pub action: JobAction,
}

impl JobDefinition {
    /// Name for log output, falling back to the index for unnamed jobs.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("job-{}", self.index)
        } else {
            self.name.clone()
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_some()
    }
}

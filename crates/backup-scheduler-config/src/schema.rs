//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub rclone: RcloneConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Jobs in registration order. A job's position is its index.
    #[serde(default)]
    pub jobs: Vec<JobSpec>,
}

/// Control API binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8098
}

/// How sync jobs invoke rclone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RcloneConfig {
    /// Program name or path of the rclone binary.
    #[serde(default = "default_rclone_binary")]
    pub binary: String,

    /// Passed as `--config <file>` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,

    /// Arguments placed before every sync job's own arguments.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for RcloneConfig {
    fn default() -> Self {
        Self {
            binary: default_rclone_binary(),
            config_file: None,
            extra_args: Vec::new(),
        }
    }
}

fn default_rclone_binary() -> String {
    "rclone".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rotated log files. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// A raw job entry as written in the config file.
///
/// Exactly one of `command` and `run` must be set; this is checked when the
/// job registry is built, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    #[serde(default)]
    pub name: String,

    /// Cron expression. Empty or missing means manual only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    /// rclone arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandLine>,

    /// Shell command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
}

impl JobSpec {
    /// Build a spec for an rclone job.
    pub fn rclone(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: Some(CommandLine::Line(command.into())),
            ..Default::default()
        }
    }

    /// Build a spec for a shell job.
    pub fn shell(name: impl Into<String>, run: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            run: Some(run.into()),
            ..Default::default()
        }
    }

    /// Set the cron schedule.
    pub fn with_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = Some(schedule.into());
        self
    }
}

/// rclone arguments, either as one whitespace-separated line or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandLine {
    Line(String),
    Args(Vec<String>),
}

impl CommandLine {
    /// Split into individual arguments, dropping empty entries.
    pub fn to_args(&self) -> Vec<String> {
        match self {
            CommandLine::Line(line) => line.split_whitespace().map(str::to_string).collect(),
            CommandLine::Args(args) => args
                .iter()
                .filter(|a| !a.trim().is_empty())
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_args().is_empty()
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

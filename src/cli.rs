//! CLI definitions for backup-scheduler.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// backup-scheduler CLI.
#[derive(Parser)]
#[command(name = "backup-scheduler")]
#[command(about = "Cron scheduler and trigger API for rclone and shell backup jobs")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        env = "BACKUP_SCHEDULER_CONFIG",
        default_value = "config/backup.toml",
        global = true
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the scheduler and control API in foreground (default)
    Run {
        /// Override server host
        #[arg(long)]
        host: Option<String>,

        /// Override server port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate the configuration and print the job table
    Check,
}

//! backup-scheduler
//!
//! Runs rclone and shell backup jobs on cron schedules and exposes a small
//! HTTP API and dashboard for listing jobs and starting them by hand.

mod cli;
mod cmd_check;
mod server;

use clap::Parser;

use backup_scheduler_config::ConfigLoader;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = ConfigLoader::load(&cli.config)?;
    server::init_tracing(&config.logging)?;

    match cli.command.unwrap_or(Commands::Run {
        host: None,
        port: None,
    }) {
        Commands::Check => cmd_check::handle_check_command(&config),
        Commands::Run { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::run_server(config).await
        }
    }
}

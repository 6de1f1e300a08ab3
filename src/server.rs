//! Logging setup and server startup.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use backup_scheduler_api::{ApiServer, ServerConfig};
use backup_scheduler_config::{Config, ConfigValidator, LoggingConfig};
use backup_scheduler_jobs::{Scheduler, SchedulerState};

/// Initialize tracing with console and optional file output.
///
/// `RUST_LOG` wins over the configured level. When a log directory is
/// configured, files rotate daily and the last 14 are kept.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&logging.level))?;

    let file_layer = match &logging.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("backup-scheduler")
                .filename_suffix("log")
                .max_log_files(14)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The guard flushes on drop, so it has to outlive main.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    Ok(())
}

/// Validate the config and build the job engine.
///
/// Every configuration error surfaces here, before any port is bound or
/// timer started.
pub(crate) fn prepare(config: &Config) -> Result<(SchedulerState, Scheduler), Box<dyn std::error::Error>> {
    let warnings = ConfigValidator::validate(config).into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let (state, scheduler) = SchedulerState::from_config(config).inspect_err(|e| {
        error!("Invalid job configuration: {}", e);
    })?;
    Ok((state, scheduler))
}

/// Run the scheduler and control API until a shutdown signal arrives.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting backup-scheduler v{}", env!("CARGO_PKG_VERSION"));

    let (state, scheduler) = prepare(&config)?;
    info!(
        "Loaded {} job(s), {} scheduled",
        state.registry().len(),
        scheduler.len()
    );
    for job in state.registry().list() {
        info!(
            "  #{} {} [{}] {}",
            job.index,
            job.display_name(),
            job.action.kind(),
            job.schedule.as_deref().unwrap_or("manual")
        );
    }

    let server = ApiServer::new(
        ServerConfig::new(&config.server.host, config.server.port),
        state.clone(),
    );
    let listener = server.bind().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let timers = scheduler.start(Arc::new(state.executor().clone()), shutdown_rx);

    server.serve(listener, shutdown_signal()).await?;

    info!("Shutting down...");
    let _ = shutdown_tx.send(true);
    for timer in timers {
        let _ = timer.await;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

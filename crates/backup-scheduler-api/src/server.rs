//! Control API server.
//!
//! Binding and serving are separate steps so that startup can finish all
//! configuration checks before the port is opened.

use std::future::Future;
use std::io;

use backup_scheduler_jobs::SchedulerState;
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::create_router;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8098,
        }
    }
}

/// The control API server.
pub struct ApiServer {
    config: ServerConfig,
    state: SchedulerState,
}

impl ApiServer {
    pub fn new(config: ServerConfig, state: SchedulerState) -> Self {
        Self { config, state }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Open the listening socket.
    pub async fn bind(&self) -> io::Result<TcpListener> {
        TcpListener::bind((self.config.host.as_str(), self.config.port)).await
    }

    /// Serve requests on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = create_router(self.state);

        info!("Jobs API listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

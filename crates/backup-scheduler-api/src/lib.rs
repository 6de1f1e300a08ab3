//! # Backup Scheduler API
//!
//! HTTP control plane for the job engine.
//!
//! ```text
//! GET  /api/jobs             - list jobs
//! POST /api/jobs/{index}     - run a job now
//! POST /api/jobs/{index}/run - run a job now
//! POST /api/jobs/...         - anything else: 400 invalid job index
//! GET  /  and  GET /jobs     - dashboard page
//! ```
//!
//! Trigger requests are answered with `202 Accepted` as soon as the executor
//! has decided; a job that is already running is not reported back.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
mod ui;

pub use error::ApiError;
pub use handlers::JobSummary;
pub use routes::create_router;
pub use server::{ApiServer, ServerConfig};

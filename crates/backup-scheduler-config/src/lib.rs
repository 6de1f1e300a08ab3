//! # Backup Scheduler Config
//!
//! Configuration management for the backup scheduler: server binding, rclone
//! invocation, logging and the ordered list of job specs.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};

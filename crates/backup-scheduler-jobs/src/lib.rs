//! # Backup Scheduler Jobs
//!
//! The scheduling and execution engine behind the control API.
//!
//! ```text
//!  config jobs ──► JobRegistry ──┬──► Scheduler (one timer task per cron job)
//!                                │          │
//!                                │          ▼
//!                                └──► Executor::trigger(index) ◄── HTTP "run now"
//!                                           │
//!                                           ▼
//!                                  child process (rclone / sh -c)
//! ```
//!
//! Both trigger sources go through [`Executor::trigger`], which guarantees at
//! most one in-flight run per job index.

pub mod definition;
pub mod error;
pub mod executor;
pub mod registry;
pub mod schedule;
pub mod scheduler;
pub mod state;

pub use definition::{JobAction, JobDefinition, ShellCommand, SyncCommand};
pub use error::JobError;
pub use executor::{Executor, ExecutorConfig, JobTrigger, RunOutcome, TriggerResult};
pub use registry::JobRegistry;
pub use schedule::ScheduleHandle;
pub use scheduler::Scheduler;
pub use state::SchedulerState;

//! Scheduler error types.

use thiserror::Error;

/// Errors from scheduler lifecycle operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler is already running")]
    AlreadyRunning,

    #[error("scheduler is not running")]
    NotRunning,
}

/// Result type alias for scheduler operations.
pub type SchedulerResult<T> = std::result::Result<T, SchedulerError>;

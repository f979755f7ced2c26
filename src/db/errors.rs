//! Fatal handle errors
//!
//! These are contract violations and failed opens. Recoverable engine
//! outcomes never use this type; they travel as a `Status` inside a
//! `Response`.

use thiserror::Error;

use crate::observability::Severity;
use crate::status::Status;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    /// Operation issued on a handle that is not running
    #[error("Cannot invoke request database closed")]
    NotRunning,

    #[error("Database already closed")]
    AlreadyClosed,

    /// Read-only open without a secondary path
    #[error("secondary_path must be non-empty")]
    MissingSecondaryPath,

    /// The engine refused to open
    #[error("{0}")]
    OpenFailed(Status),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read configuration: {0}")]
    ConfigIo(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("workers must be at least 1, got {0}")]
    InvalidWorkers(usize),

    /// A blocking task of the async client panicked or was cancelled
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

impl DbError {
    pub fn code(&self) -> &'static str {
        match self {
            DbError::NotRunning => "STRATA_NOT_RUNNING",
            DbError::AlreadyClosed => "STRATA_ALREADY_CLOSED",
            DbError::MissingSecondaryPath => "STRATA_MISSING_SECONDARY_PATH",
            DbError::OpenFailed(_) => "STRATA_OPEN_FAILED",
            DbError::InvalidConfig(_) => "STRATA_INVALID_CONFIG",
            DbError::ConfigIo(_) => "STRATA_CONFIG_IO",
            DbError::ConfigParse(_) => "STRATA_CONFIG_PARSE",
            DbError::InvalidWorkers(_) => "STRATA_INVALID_WORKERS",
            DbError::TaskFailed(_) => "STRATA_TASK_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }

    /// Engine status behind a failed open
    pub fn status(&self) -> Option<&Status> {
        match self {
            DbError::OpenFailed(status) => Some(status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DbError::NotRunning.to_string(),
            "Cannot invoke request database closed"
        );
        assert_eq!(DbError::AlreadyClosed.to_string(), "Database already closed");
        assert_eq!(
            DbError::MissingSecondaryPath.to_string(),
            "secondary_path must be non-empty"
        );
    }

    #[test]
    fn test_open_failed_renders_status() {
        let err = DbError::OpenFailed(Status::io_error("lock held"));
        assert_eq!(err.to_string(), "IO error: lock held");
        assert!(err.status().unwrap().is_io_error());
        assert_eq!(err.code(), "STRATA_OPEN_FAILED");
    }

    #[test]
    fn test_all_fatal() {
        assert_eq!(DbError::TaskFailed("x".into()).severity(), Severity::Fatal);
        assert_eq!(DbError::InvalidWorkers(0).severity(), Severity::Fatal);
    }
}

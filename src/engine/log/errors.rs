//! Log engine error types
//!
//! Error codes:
//! - STRATA_LOG_APPEND_FAILED (ERROR severity)
//! - STRATA_LOG_FSYNC_FAILED (FATAL severity)
//! - STRATA_LOG_CORRUPTION (FATAL severity)
//! - STRATA_TABLE_IO_FAILED (ERROR severity)
//!
//! Every `LogError` becomes a `Status` at the engine boundary.

use std::fmt;
use std::io;

use crate::status::Status;

/// Severity levels for log engine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, handle stays usable
    Error,
    /// Durability can no longer be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorCode {
    /// Log write failed
    AppendFailed,
    /// Log fsync failed
    FsyncFailed,
    /// Checksum or framing failure
    Corruption,
    /// TABLE / OPTIONS / IDENTITY file access failed
    TableIoFailed,
}

impl LogErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorCode::AppendFailed => "STRATA_LOG_APPEND_FAILED",
            LogErrorCode::FsyncFailed => "STRATA_LOG_FSYNC_FAILED",
            LogErrorCode::Corruption => "STRATA_LOG_CORRUPTION",
            LogErrorCode::TableIoFailed => "STRATA_TABLE_IO_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            LogErrorCode::AppendFailed => Severity::Error,
            LogErrorCode::FsyncFailed => Severity::Fatal,
            LogErrorCode::Corruption => Severity::Fatal,
            LogErrorCode::TableIoFailed => Severity::Error,
        }
    }
}

impl fmt::Display for LogErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Log engine error with context
#[derive(Debug)]
pub struct LogError {
    code: LogErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl LogError {
    pub fn append_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::AppendFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    pub fn fsync_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::FsyncFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    pub fn table_io(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: LogErrorCode::TableIoFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    pub fn corruption(message: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::Corruption,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Corruption with sequence number context
    pub fn corruption_at_sequence(sequence: u64, reason: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::Corruption,
            message: reason.into(),
            details: Some(format!("sequence_number: {}", sequence)),
            source: None,
        }
    }

    /// Corruption with byte offset context
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            code: LogErrorCode::Corruption,
            message: reason.into(),
            details: Some(format!("byte_offset: {}", offset)),
            source: None,
        }
    }

    pub fn code(&self) -> LogErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Status reported to the handle for this error
    pub fn to_status(&self) -> Status {
        let mut message = self.message.clone();
        if let Some(details) = &self.details {
            message.push_str(&format!(" ({})", details));
        }
        match (&self.code, &self.source) {
            (LogErrorCode::Corruption, _) => Status::corruption(message),
            (_, Some(source)) => Status::from_io(message, source),
            (_, None) => Status::io_error(message),
        }
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<LogError> for Status {
    fn from(err: LogError) -> Self {
        err.to_status()
    }
}

pub type LogResult<T> = Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LogErrorCode::AppendFailed.code(), "STRATA_LOG_APPEND_FAILED");
        assert_eq!(LogErrorCode::FsyncFailed.code(), "STRATA_LOG_FSYNC_FAILED");
        assert_eq!(LogErrorCode::Corruption.code(), "STRATA_LOG_CORRUPTION");
        assert_eq!(LogErrorCode::TableIoFailed.code(), "STRATA_TABLE_IO_FAILED");
    }

    #[test]
    fn test_fsync_and_corruption_are_fatal() {
        let err = LogError::fsync_failed("fsync", io::Error::new(io::ErrorKind::Other, "disk"));
        assert!(err.is_fatal());
        assert!(LogError::corruption("bad crc").is_fatal());
        let err = LogError::append_failed("write", io::Error::new(io::ErrorKind::Other, "x"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_status_mapping() {
        let status = LogError::corruption_at_offset(128, "Checksum mismatch").to_status();
        assert!(status.is_corruption());
        assert!(status.message().contains("byte_offset: 128"));

        let full = LogError::append_failed("write", io::Error::from_raw_os_error(28));
        assert!(Status::from(full).is_no_space());

        let missing = LogError::table_io("read TABLE", io::Error::new(io::ErrorKind::NotFound, "x"));
        assert!(missing.to_status().is_path_not_found());
    }

    #[test]
    fn test_display_contains_code_and_details() {
        let err = LogError::corruption_at_sequence(42, "Non-sequential sequence number");
        let display = err.to_string();
        assert!(display.contains("STRATA_LOG_CORRUPTION"));
        assert!(display.contains("FATAL"));
        assert!(display.contains("sequence_number: 42"));
    }
}

//! Observable events
//!
//! Events are explicit and typed; each carries a default severity.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Handle lifecycle
    DbOpenBegin,
    DbOpenComplete,
    DbOpenFailed,
    DbClose,

    // Handle operations
    OptionsChanged,
    FlushComplete,
    CatchUpComplete,
    OperationFailed,

    // Engine internals
    WalReplayComplete,
    WalTailTruncated,
    AutoFlush,

    /// Build metadata dump at client start
    BuildInfo,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DbOpenBegin => "DB_OPEN_BEGIN",
            Event::DbOpenComplete => "DB_OPEN_COMPLETE",
            Event::DbOpenFailed => "DB_OPEN_FAILED",
            Event::DbClose => "DB_CLOSE",
            Event::OptionsChanged => "OPTIONS_CHANGED",
            Event::FlushComplete => "FLUSH_COMPLETE",
            Event::CatchUpComplete => "CATCH_UP_COMPLETE",
            Event::OperationFailed => "OPERATION_FAILED",
            Event::WalReplayComplete => "WAL_REPLAY_COMPLETE",
            Event::WalTailTruncated => "WAL_TAIL_TRUNCATED",
            Event::AutoFlush => "AUTO_FLUSH",
            Event::BuildInfo => "BUILD_INFO",
        }
    }

    /// Severity used when the event is logged without an override
    pub fn severity(&self) -> Severity {
        match self {
            Event::DbOpenFailed => Severity::Fatal,
            Event::OperationFailed | Event::WalTailTruncated => Severity::Warn,
            Event::WalReplayComplete | Event::AutoFlush => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_upper_snake() {
        let events = [
            Event::DbOpenBegin,
            Event::DbOpenComplete,
            Event::DbOpenFailed,
            Event::DbClose,
            Event::OptionsChanged,
            Event::FlushComplete,
            Event::CatchUpComplete,
            Event::OperationFailed,
            Event::WalReplayComplete,
            Event::WalTailTruncated,
            Event::AutoFlush,
            Event::BuildInfo,
        ];
        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_default_severities() {
        assert_eq!(Event::DbOpenFailed.severity(), Severity::Fatal);
        assert_eq!(Event::OperationFailed.severity(), Severity::Warn);
        assert_eq!(Event::DbOpenComplete.severity(), Severity::Info);
    }
}

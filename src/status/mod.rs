//! Operation outcome classification
//!
//! Every handle operation reports its recoverable outcome as a `Status`:
//! either OK or exactly one of the failure categories below, plus a
//! human-readable message.
//!
//! Statuses are produced by the engine boundary or by the handle's own
//! argument validation. Callers branch on `is_ok()` and the predicates.

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

/// Status categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    Ok,
    NotFound,
    Corruption,
    NotSupported,
    InvalidArgument,
    IoError,
    MergeInProgress,
    Incomplete,
    ShutdownInProgress,
    TimedOut,
    Aborted,
    LockLimit,
    Busy,
    Deadlock,
    Expired,
    TryAgain,
    CompactionTooLarge,
    ColumnFamilyDropped,
    NoSpace,
    MemoryLimit,
    PathNotFound,
    ManualCompactionPaused,
    TxnNotPrepared,
    IoFenced,
    OkOverwritten,
}

impl Code {
    /// Every failure category, in declaration order
    pub const FAILURES: [Code; 24] = [
        Code::NotFound,
        Code::Corruption,
        Code::NotSupported,
        Code::InvalidArgument,
        Code::IoError,
        Code::MergeInProgress,
        Code::Incomplete,
        Code::ShutdownInProgress,
        Code::TimedOut,
        Code::Aborted,
        Code::LockLimit,
        Code::Busy,
        Code::Deadlock,
        Code::Expired,
        Code::TryAgain,
        Code::CompactionTooLarge,
        Code::ColumnFamilyDropped,
        Code::NoSpace,
        Code::MemoryLimit,
        Code::PathNotFound,
        Code::ManualCompactionPaused,
        Code::TxnNotPrepared,
        Code::IoFenced,
        Code::OkOverwritten,
    ];

    /// Text used as the prefix of the rendered status
    pub fn describe(&self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::NotFound => "NotFound",
            Code::Corruption => "Corruption",
            Code::NotSupported => "Not implemented",
            Code::InvalidArgument => "Invalid argument",
            Code::IoError => "IO error",
            Code::MergeInProgress => "Merge in progress",
            Code::Incomplete => "Result incomplete",
            Code::ShutdownInProgress => "Shutdown in progress",
            Code::TimedOut => "Operation timed out",
            Code::Aborted => "Operation aborted",
            Code::LockLimit => "Lock limit reached",
            Code::Busy => "Resource busy",
            Code::Deadlock => "Deadlock",
            Code::Expired => "Operation expired",
            Code::TryAgain => "Operation failed. Try again.",
            Code::CompactionTooLarge => "Compaction too large",
            Code::ColumnFamilyDropped => "Column family dropped",
            Code::NoSpace => "No space left on device",
            Code::MemoryLimit => "Memory limit reached",
            Code::PathNotFound => "Path not found",
            Code::ManualCompactionPaused => "Manual compaction paused",
            Code::TxnNotPrepared => "Txn not prepared",
            Code::IoFenced => "IO fenced off",
            Code::OkOverwritten => "OK (overwritten)",
        }
    }

    /// Name of the predicate matching this code, as exported by `Status::to_map`
    pub fn predicate_name(&self) -> &'static str {
        match self {
            Code::Ok => "ok",
            Code::NotFound => "is_not_found",
            Code::Corruption => "is_corruption",
            Code::NotSupported => "is_not_supported",
            Code::InvalidArgument => "is_invalid_argument",
            Code::IoError => "is_io_error",
            Code::MergeInProgress => "is_merge_in_progress",
            Code::Incomplete => "is_incomplete",
            Code::ShutdownInProgress => "is_shutdown_in_progress",
            Code::TimedOut => "is_timed_out",
            Code::Aborted => "is_aborted",
            Code::LockLimit => "is_lock_limit",
            Code::Busy => "is_busy",
            Code::Deadlock => "is_deadlock",
            Code::Expired => "is_expired",
            Code::TryAgain => "is_try_again",
            Code::CompactionTooLarge => "is_compaction_too_large",
            Code::ColumnFamilyDropped => "is_column_family_dropped",
            Code::NoSpace => "is_no_space",
            Code::MemoryLimit => "is_memory_limit",
            Code::PathNotFound => "is_path_not_found",
            Code::ManualCompactionPaused => "is_manual_compaction_paused",
            Code::TxnNotPrepared => "is_txn_not_prepared",
            Code::IoFenced => "is_io_fenced",
            Code::OkOverwritten => "is_ok_overwritten",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Outcome of a single operation.
///
/// Invariant: the code is either `Ok` or exactly one failure category, and
/// the message is empty when ok.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    code: Code,
    message: String,
}

macro_rules! status_constructors {
    ($($(#[$doc:meta])* $name:ident => $code:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(Code::$code, message)
            }
        )*
    };
}

macro_rules! status_predicates {
    ($($name:ident => $code:ident),* $(,)?) => {
        $(
            pub fn $name(&self) -> bool {
                self.code == Code::$code
            }
        )*
    };
}

impl Status {
    fn new(code: Code, message: impl Into<String>) -> Self {
        if code == Code::Ok {
            return Self::ok();
        }
        Self {
            code,
            message: message.into(),
        }
    }

    /// Successful outcome
    pub fn ok() -> Self {
        Self {
            code: Code::Ok,
            message: String::new(),
        }
    }

    /// Build a status from an explicit code.
    ///
    /// The message is dropped for `Code::Ok`.
    pub fn from_code(code: Code, message: impl Into<String>) -> Self {
        Self::new(code, message)
    }

    status_constructors! {
        /// Key or property absent
        not_found => NotFound,
        /// Data failed an integrity check
        corruption => Corruption,
        /// Operation not available in this mode or configuration
        not_supported => NotSupported,
        /// Caller supplied an unusable argument
        invalid_argument => InvalidArgument,
        io_error => IoError,
        merge_in_progress => MergeInProgress,
        incomplete => Incomplete,
        shutdown_in_progress => ShutdownInProgress,
        timed_out => TimedOut,
        aborted => Aborted,
        lock_limit => LockLimit,
        busy => Busy,
        deadlock => Deadlock,
        expired => Expired,
        try_again => TryAgain,
        compaction_too_large => CompactionTooLarge,
        column_family_dropped => ColumnFamilyDropped,
        no_space => NoSpace,
        memory_limit => MemoryLimit,
        path_not_found => PathNotFound,
        manual_compaction_paused => ManualCompactionPaused,
        txn_not_prepared => TxnNotPrepared,
        io_fenced => IoFenced,
        ok_overwritten => OkOverwritten,
    }

    /// Classify an I/O error raised inside an engine
    pub fn from_io(context: impl fmt::Display, err: &io::Error) -> Self {
        let message = format!("{}: {}", context, err);
        // ENOSPC
        if err.raw_os_error() == Some(28) {
            return Self::no_space(message);
        }
        match err.kind() {
            io::ErrorKind::NotFound => Self::path_not_found(message),
            _ => Self::io_error(message),
        }
    }

    /// Returns the category
    pub fn code(&self) -> Code {
        self.code
    }

    /// Returns the message; empty when ok
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True only for a plain successful outcome
    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok
    }

    status_predicates! {
        is_not_found => NotFound,
        is_corruption => Corruption,
        is_not_supported => NotSupported,
        is_invalid_argument => InvalidArgument,
        is_io_error => IoError,
        is_merge_in_progress => MergeInProgress,
        is_incomplete => Incomplete,
        is_shutdown_in_progress => ShutdownInProgress,
        is_timed_out => TimedOut,
        is_aborted => Aborted,
        is_lock_limit => LockLimit,
        is_busy => Busy,
        is_deadlock => Deadlock,
        is_expired => Expired,
        is_try_again => TryAgain,
        is_compaction_too_large => CompactionTooLarge,
        is_column_family_dropped => ColumnFamilyDropped,
        is_no_space => NoSpace,
        is_memory_limit => MemoryLimit,
        is_path_not_found => PathNotFound,
        is_manual_compaction_paused => ManualCompactionPaused,
        is_txn_not_prepared => TxnNotPrepared,
        is_io_fenced => IoFenced,
        is_ok_overwritten => OkOverwritten,
    }

    /// Flat export of `ok`, `message` and every predicate.
    pub fn to_map(&self) -> BTreeMap<&'static str, serde_json::Value> {
        let mut map = BTreeMap::new();
        map.insert("ok", serde_json::Value::Bool(self.is_ok()));
        map.insert("message", serde_json::Value::String(self.message.clone()));
        for code in Code::FAILURES {
            map.insert(
                code.predicate_name(),
                serde_json::Value::Bool(self.code == code),
            );
        }
        map
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ok()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

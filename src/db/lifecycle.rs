//! Handle lifecycle state machine
//!
//! ```text
//! Unopened --start--> Running --close--> Closed
//! ```
//!
//! Closed is terminal. A handle that fails to open never leaves Unopened
//! and is never handed to the caller.

use std::fmt;

use super::errors::{DbError, DbResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Unopened,
    Running,
    Closed,
}

impl HandleState {
    pub fn new() -> Self {
        HandleState::Unopened
    }

    /// Unopened -> Running, after the engine opened
    pub fn start(self) -> DbResult<Self> {
        match self {
            HandleState::Unopened => Ok(HandleState::Running),
            HandleState::Running => Ok(HandleState::Running),
            HandleState::Closed => Err(DbError::AlreadyClosed),
        }
    }

    /// Running -> Closed
    pub fn close(self) -> DbResult<Self> {
        match self {
            HandleState::Running => Ok(HandleState::Closed),
            HandleState::Closed => Err(DbError::AlreadyClosed),
            HandleState::Unopened => Err(DbError::NotRunning),
        }
    }

    /// Every request goes through here first
    pub fn ensure_running(&self) -> DbResult<()> {
        match self {
            HandleState::Running => Ok(()),
            _ => Err(DbError::NotRunning),
        }
    }

    pub fn is_running(&self) -> bool {
        *self == HandleState::Running
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HandleState::Unopened => "unopened",
            HandleState::Running => "running",
            HandleState::Closed => "closed",
        }
    }
}

impl Default for HandleState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the handle holds the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Read/write owner
    Primary,
    /// Read-only replica tailing a primary
    Secondary,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::Primary => "primary",
            AccessMode::Secondary => "secondary",
        }
    }

    pub fn is_secondary(&self) -> bool {
        *self == AccessMode::Secondary
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

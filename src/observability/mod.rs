//! Observability
//!
//! Structured JSON logging of handle lifecycle and engine events.
//!
//! ```ignore
//! use stratakv::observability::{Event, Logger};
//!
//! Logger::event(Event::DbOpenComplete, &[("path", "/var/lib/db")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Elapsed-time helper for log fields
pub struct Timer {
    start: std::time::Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

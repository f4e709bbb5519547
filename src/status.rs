//! Diagnostics channel for sink lifecycle problems
//!
//! Status records are kept apart from the log event stream so that a
//! misconfigured sink can report itself without going through the very
//! pipeline it is part of.

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLevel::Info => write!(f, "INFO"),
            StatusLevel::Warn => write!(f, "WARN"),
            StatusLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// One diagnostics record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    /// Name of the component that raised it
    pub origin: String,
    pub message: String,
}

impl Status {
    pub fn info<O: Into<String>, M: Into<String>>(origin: O, message: M) -> Self {
        Self {
            level: StatusLevel::Info,
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn error<O: Into<String>, M: Into<String>>(origin: O, message: M) -> Self {
        Self {
            level: StatusLevel::Error,
            origin: origin.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {} - {}", self.level, self.origin, self.message)
    }
}

/// Collects status records raised by sinks
#[derive(Debug, Default)]
pub struct StatusManager {
    statuses: Mutex<Vec<Status>>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status
    pub fn add(&self, status: Status) {
        self.statuses.lock().push(status);
    }

    /// Snapshot of everything recorded so far
    pub fn statuses(&self) -> Vec<Status> {
        self.statuses.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.statuses.lock().len()
    }

    pub fn error_count(&self) -> usize {
        self.statuses
            .lock()
            .iter()
            .filter(|s| s.level == StatusLevel::Error)
            .count()
    }

    pub fn clear(&self) {
        self.statuses.lock().clear();
    }

    /// Write every recorded status, one per line
    pub fn print_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for status in self.statuses.lock().iter() {
            writeln!(out, "{}", status)?;
        }
        out.flush()
    }
}

//! Data structures shared by the pipeline, appenders and sink
//! Contains the severity scale and the log event record

use crate::errors::{SinkError, SinkResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Ordered log severity, least severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// True when `self` is at least as severe as `other`
    pub fn is_at_least(self, other: Severity) -> bool {
        self >= other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = SinkError;

    fn from_str(s: &str) -> SinkResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            other => Err(SinkError::config(format!(
                "Unknown severity '{}', expected one of: trace, debug, info, warn, error",
                other
            ))),
        }
    }
}

// tracing::Level orders TRACE as the greatest, so map explicitly
impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Severity::Trace,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warn,
            tracing::Level::ERROR => Severity::Error,
        }
    }
}

/// A single log record travelling through a pipeline
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub severity: Severity,
    /// Logger name / module the record came from
    pub target: String,
    /// Raw, unformatted message text
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    /// Create an event stamped with the current time
    pub fn new<T: Into<String>, M: Into<String>>(
        severity: Severity,
        target: T,
        message: M,
    ) -> Self {
        Self {
            severity,
            target: target.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

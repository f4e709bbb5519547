//! Layouts turning a log event into the text sent to a destination

use crate::errors::{SinkError, SinkResult};
use crate::types::LogEvent;
use std::str::FromStr;
use std::sync::Arc;

/// Formatter capability: event in, text out
pub trait Layout: Send + Sync {
    fn format(&self, event: &LogEvent) -> String;
}

impl<F> Layout for F
where
    F: Fn(&LogEvent) -> String + Send + Sync,
{
    fn format(&self, event: &LogEvent) -> String {
        self(event)
    }
}

/// Emits the raw message unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageLayout;

impl Layout for MessageLayout {
    fn format(&self, event: &LogEvent) -> String {
        event.message.clone()
    }
}

/// `<timestamp> <LEVEL> <target> - <message>`
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleLayout;

impl Layout for SimpleLayout {
    fn format(&self, event: &LogEvent) -> String {
        format!(
            "{} {:<5} {} - {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            event.severity,
            event.target,
            event.message
        )
    }
}

/// Built-in layouts selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Simple,
    Message,
}

impl LayoutKind {
    pub fn build(self) -> Arc<dyn Layout> {
        match self {
            LayoutKind::Simple => Arc::new(SimpleLayout),
            LayoutKind::Message => Arc::new(MessageLayout),
        }
    }
}

impl FromStr for LayoutKind {
    type Err = SinkError;

    fn from_str(s: &str) -> SinkResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(LayoutKind::Simple),
            "message" => Ok(LayoutKind::Message),
            other => Err(SinkError::config(format!(
                "Unknown layout '{}', expected 'simple' or 'message'",
                other
            ))),
        }
    }
}

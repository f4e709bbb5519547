//! In-memory sink collecting events at or above a threshold

use super::EventSink;
use crate::pipeline::LogPipeline;
use crate::types::{LogEvent, Severity};
use parking_lot::Mutex;

/// Keeps every accepted event in memory, in arrival order
pub struct ListSink {
    threshold: Severity,
    events: Mutex<Vec<LogEvent>>,
}

impl ListSink {
    pub fn new(threshold: Severity) -> Self {
        Self {
            threshold,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.message.clone()).collect()
    }

    /// True if an event with exactly this severity and message was captured
    pub fn contains(&self, severity: Severity, message: &str) -> bool {
        self.events
            .lock()
            .iter()
            .any(|e| e.severity == severity && e.message == message)
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for ListSink {
    fn name(&self) -> &str {
        "list"
    }

    fn send_event(&self, event: &LogEvent, _pipeline: &LogPipeline) {
        if event.severity.is_at_least(self.threshold) {
            self.events.lock().push(event.clone());
        }
    }
}

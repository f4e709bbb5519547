//! Console event sink for local visibility of sink activity

use super::{EventSink, Layout};
use crate::pipeline::LogPipeline;
use crate::types::{LogEvent, Severity};
use parking_lot::{Mutex, MutexGuard};
use std::io::{self, Write};
use std::sync::Arc;

/// Writes formatted events at or above a threshold to a writer
pub struct ConsoleSink<W: Write + Send = io::Stderr> {
    threshold: Severity,
    layout: Arc<dyn Layout>,
    writer: Mutex<W>,
}

impl ConsoleSink<io::Stderr> {
    /// Console sink writing to stderr
    pub fn stderr(threshold: Severity, layout: Arc<dyn Layout>) -> Self {
        Self::with_writer(threshold, layout, io::stderr())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn with_writer(threshold: Severity, layout: Arc<dyn Layout>, writer: W) -> Self {
        Self {
            threshold,
            layout,
            writer: Mutex::new(writer),
        }
    }

    pub fn writer(&self) -> MutexGuard<'_, W> {
        self.writer.lock()
    }
}

impl<W: Write + Send> EventSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn send_event(&self, event: &LogEvent, _pipeline: &LogPipeline) {
        if !event.severity.is_at_least(self.threshold) {
            return;
        }

        let line = self.layout.format(event);
        let mut writer = self.writer.lock();
        // Console output is best effort; a closed stderr must not break the pipeline
        let _ = writeln!(writer, "{}", line).and_then(|_| writer.flush());
    }
}

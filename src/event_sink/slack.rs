//! Slack webhook event sink
//!
//! Forwards events at or above a threshold to a webhook and records the
//! result as a DEBUG self-log in the same pipeline. The self-log carries
//! [`SELF_LOG_MARKER`]; events containing it are never forwarded, which
//! breaks the loop the self-log would otherwise create. A user message
//! that happens to contain the marker is dropped as well.

use super::{DeliveryClient, EventSink, Layout};
use crate::pipeline::LogPipeline;
use crate::status::{Status, StatusManager};
use crate::types::{LogEvent, Severity};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Prefix of every delivery self-log message
pub const SELF_LOG_MARKER: &str = "slack logging response: ";

/// Target of delivery self-log events
pub const SELF_LOG_TARGET: &str = "log2slack::sink";

/// Default sink name used in diagnostics
pub const DEFAULT_SINK_NAME: &str = "slack";

/// Sink posting selected log events to a Slack incoming webhook
///
/// Configure with the setters before sharing the sink, then call
/// [`SlackSink::activate`]. An inactive sink drops everything.
pub struct SlackSink {
    name: String,
    threshold: Option<Severity>,
    endpoint: Option<String>,
    layout: Option<Arc<dyn Layout>>,
    client: Arc<dyn DeliveryClient>,
    status: Arc<StatusManager>,
    active: AtomicBool,
}

impl SlackSink {
    /// Create an unconfigured, inactive sink
    pub fn new(client: Arc<dyn DeliveryClient>, status: Arc<StatusManager>) -> Self {
        Self {
            name: DEFAULT_SINK_NAME.to_string(),
            threshold: None,
            endpoint: None,
            layout: None,
            client,
            status,
            active: AtomicBool::new(false),
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_layout(mut self, layout: Arc<dyn Layout>) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn set_threshold(&mut self, threshold: Option<Severity>) {
        self.threshold = threshold;
    }

    pub fn set_endpoint(&mut self, endpoint: Option<String>) {
        self.endpoint = endpoint;
    }

    pub fn set_layout(&mut self, layout: Option<Arc<dyn Layout>>) {
        self.layout = layout;
    }

    pub fn threshold(&self) -> Option<Severity> {
        self.threshold
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Validate the configuration and activate when it is complete
    ///
    /// Every missing field is reported as its own error status. Returns
    /// the number of errors reported; the sink stays in its previous
    /// state when that is non-zero.
    pub fn activate(&self) -> usize {
        let mut errors = 0;

        if self.threshold.is_none() {
            self.report_missing("level");
            errors += 1;
        }
        if self.endpoint.is_none() {
            self.report_missing("endpoint");
            errors += 1;
        }
        if self.layout.is_none() {
            self.report_missing("layout");
            errors += 1;
        }

        if errors == 0 {
            self.active.store(true, Ordering::Release);
        }
        errors
    }

    fn report_missing(&self, field: &str) {
        self.status.add(Status::error(
            self.name.clone(),
            format!("No {} set for the sink named \"{}\".", field, self.name),
        ));
    }

    /// Filter, format and deliver one event
    ///
    /// Never fails: delivery problems only show up in the self-log text.
    pub fn dispatch(&self, event: &LogEvent, pipeline: &LogPipeline) {
        if !self.is_active() {
            return;
        }

        // activate() only succeeds with all three present
        let (Some(threshold), Some(endpoint), Some(layout)) =
            (self.threshold, self.endpoint.as_deref(), self.layout.as_ref())
        else {
            return;
        };

        if event.message.contains(SELF_LOG_MARKER) {
            return;
        }
        if !event.severity.is_at_least(threshold) {
            return;
        }

        let payload = layout.format(event);
        let outcome = self.client.send(endpoint, &payload);

        pipeline.dispatch(&LogEvent::new(
            Severity::Debug,
            SELF_LOG_TARGET,
            format!("{}{}", SELF_LOG_MARKER, outcome),
        ));
    }
}

impl EventSink for SlackSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_event(&self, event: &LogEvent, pipeline: &LogPipeline) {
        self.dispatch(event, pipeline);
    }
}

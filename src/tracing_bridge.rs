//! Bridge from `tracing` events into a logging pipeline
//!
//! Install [`PipelineLayer`] on a `tracing_subscriber` registry so that
//! ordinary `tracing` macros feed the pipeline's sinks.

use crate::pipeline::LogPipeline;
use crate::types::{LogEvent, Severity};
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Crates whose own logging never enters a pipeline
///
/// The webhook client runs on top of these. Their events describe the
/// delivery in progress, and forwarding them would trigger more
/// deliveries.
const HTTP_STACK_CRATES: &[&str] = &[
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
    "tokio",
    "mio",
    "want",
];

/// Thread the blocking reqwest client drives its connections on
const HTTP_RUNTIME_THREAD: &str = "reqwest-internal-sync-runtime";

/// Field carrying the real target of a record bridged from the `log` crate
const LOG_TARGET_FIELD: &str = "log.target";

fn is_http_stack(target: &str) -> bool {
    let krate = target.split("::").next().unwrap_or(target);
    HTTP_STACK_CRATES.contains(&krate)
}

fn on_http_runtime_thread() -> bool {
    std::thread::current().name() == Some(HTTP_RUNTIME_THREAD)
}

/// Collects the message and remaining fields of a tracing event
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    log_target: Option<String>,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn into_message(self) -> String {
        let mut text = self.message.unwrap_or_default();
        for field in self.fields {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&field);
        }
        text
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            LOG_TARGET_FIELD => self.log_target = Some(value.to_string()),
            name if name.starts_with("log.") => {}
            name => self.fields.push(format!("{}={}", name, value)),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = Some(format!("{:?}", value)),
            name if name.starts_with("log.") => {}
            name => self.fields.push(format!("{}={:?}", name, value)),
        }
    }
}

/// Tracing layer dispatching application events into a [`LogPipeline`]
///
/// Three kinds of events are ignored, since they come from the webhook
/// delivery itself and would otherwise feed back into the sink that is
/// delivering:
/// - events raised on a thread that is already inside a pipeline dispatch;
/// - events raised on the blocking reqwest client's I/O thread;
/// - events whose target belongs to the HTTP stack (reqwest, hyper, h2 and
///   their runtime), including records bridged from the `log` crate.
#[derive(Clone)]
pub struct PipelineLayer {
    pipeline: Arc<LogPipeline>,
}

impl PipelineLayer {
    pub fn new(pipeline: Arc<LogPipeline>) -> Self {
        Self { pipeline }
    }
}

impl<S> Layer<S> for PipelineLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if LogPipeline::in_dispatch() || on_http_runtime_thread() {
            return;
        }

        let metadata = event.metadata();
        if is_http_stack(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let target = visitor
            .log_target
            .take()
            .unwrap_or_else(|| metadata.target().to_string());
        if is_http_stack(&target) {
            return;
        }

        let log_event = LogEvent::new(
            Severity::from(*metadata.level()),
            target,
            visitor.into_message(),
        );
        self.pipeline.dispatch(&log_event);
    }
}

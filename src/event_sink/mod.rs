//! Event sinks attached to a logging pipeline
//! Provides the Slack webhook sink plus console and in-memory sinks

use crate::pipeline::LogPipeline;
use crate::types::LogEvent;

pub mod event_formatter;
pub mod http;
pub mod list;
pub mod slack;
pub mod stdout;

/// EventSink trait for receiving dispatched log events
///
/// `pipeline` is the pipeline currently dispatching `event`; sinks may
/// dispatch follow-up events into it.
pub trait EventSink: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Receive one log event
    fn send_event(&self, event: &LogEvent, pipeline: &LogPipeline);
}

pub use event_formatter::*;
pub use http::*;
pub use list::*;
pub use slack::*;
pub use stdout::*;

//! Logging pipeline that fans log events out to attached sinks
//!
//! A pipeline is an explicit value, never a process-wide registry. Sinks
//! receive a reference to the pipeline that called them so they can emit
//! follow-up events (such as a delivery self-log) back into it.

use crate::event_sink::EventSink;
use crate::types::LogEvent;
use parking_lot::RwLock;
use std::cell::Cell;
use std::sync::Arc;

thread_local! {
    static DISPATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Tracks dispatch nesting on the current thread
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        DISPATCH_DEPTH.with(|d| d.set(d.get() + 1));
        DepthGuard
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Ordered set of sinks receiving every dispatched event
#[derive(Default)]
pub struct LogPipeline {
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
}

impl LogPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a sink; it receives events dispatched from now on
    pub fn attach(&self, sink: Arc<dyn EventSink>) {
        self.sinks.write().push(sink);
    }

    /// Detach a previously attached sink. Returns false if it was not attached.
    pub fn detach(&self, sink: &Arc<dyn EventSink>) -> bool {
        let mut sinks = self.sinks.write();
        let before = sinks.len();
        sinks.retain(|s| !std::ptr::addr_eq(Arc::as_ptr(s), Arc::as_ptr(sink)));
        sinks.len() != before
    }

    /// Attach a sink for the lifetime of the returned guard
    pub fn attach_scoped(&self, sink: Arc<dyn EventSink>) -> ScopedSink<'_> {
        self.attach(sink.clone());
        ScopedSink {
            pipeline: self,
            sink,
        }
    }

    /// Hand an event to every attached sink, in attachment order
    pub fn dispatch(&self, event: &LogEvent) {
        // Snapshot so sinks can dispatch back into us without holding the lock
        let sinks: Vec<Arc<dyn EventSink>> = self.sinks.read().clone();
        let _depth = DepthGuard::enter();
        for sink in &sinks {
            sink.send_event(event, self);
        }
    }

    pub fn len(&self) -> usize {
        self.sinks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.read().is_empty()
    }

    /// True while the current thread is inside any pipeline dispatch
    pub fn in_dispatch() -> bool {
        DISPATCH_DEPTH.with(|d| d.get() > 0)
    }
}

/// Detaches its sink from the pipeline when dropped, including on unwind
pub struct ScopedSink<'a> {
    pipeline: &'a LogPipeline,
    sink: Arc<dyn EventSink>,
}

impl Drop for ScopedSink<'_> {
    fn drop(&mut self) {
        self.pipeline.detach(&self.sink);
    }
}

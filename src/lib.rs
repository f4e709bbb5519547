//! Slack log sink
//!
//! Forwards selected log events to a Slack incoming webhook. The sink only
//! activates once its threshold, endpoint and layout are all configured,
//! reports each missing one on a [`StatusManager`], and records every
//! delivery as a DEBUG self-log that it refuses to forward again.
//!
//! ```rust,ignore
//! use log2slack::{LogPipeline, PipelineLayer, SinkSettings, StatusManager};
//! use std::sync::Arc;
//! use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
//!
//! let status = Arc::new(StatusManager::new());
//! let sink = Arc::new(SinkSettings::from_env()?.build_sink(status.clone())?);
//! sink.activate();
//!
//! let pipeline = Arc::new(LogPipeline::new());
//! pipeline.attach(sink);
//! tracing_subscriber::registry()
//!     .with(PipelineLayer::new(pipeline))
//!     .init();
//!
//! tracing::error!("payment provider unreachable");
//! ```

pub mod config;
pub mod errors;
pub mod event_sink;
pub mod pipeline;
pub mod status;
pub mod tracing_bridge;
pub mod types;

pub use config::{SinkSettings, SinkSettingsOverride};
pub use errors::{SinkError, SinkResult};
pub use event_sink::{
    ConsoleSink, DeliveryClient, DeliveryOutcome, EventSink, HttpDeliveryClient,
    HttpDeliveryConfig, Layout, LayoutKind, ListSink, MessageLayout, SELF_LOG_MARKER,
    SimpleLayout, SlackSink,
};
pub use pipeline::{LogPipeline, ScopedSink};
pub use status::{Status, StatusLevel, StatusManager};
pub use tracing_bridge::PipelineLayer;
pub use types::{LogEvent, Severity};

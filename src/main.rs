//! log2slack - send a log message through a Slack webhook sink
//!
//! Reads the sink settings from the environment (see `SinkSettings::from_env`),
//! lets command line flags override them, and logs one message through a
//! pipeline holding the Slack sink and a console sink. The console shows
//! the sink's delivery self-log.

use anyhow::Result;
use clap::Parser;
use log2slack::{
    ConsoleSink, LayoutKind, LogPipeline, PipelineLayer, Severity, SimpleLayout, SinkSettings,
    SinkSettingsOverride, StatusManager,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "log2slack",
    about = "Forward a log message to a Slack incoming webhook",
    version
)]
struct Args {
    /// Message to log
    message: String,

    /// Severity of the logged message
    #[arg(short, long, default_value = "error")]
    severity: Severity,

    /// Webhook URL (overrides SLACK_WEBHOOK_URL)
    #[arg(long)]
    endpoint: Option<String>,

    /// Minimum severity forwarded to Slack (overrides SLACK_LOG_LEVEL)
    #[arg(short, long)]
    level: Option<Severity>,

    /// Layout of the posted text: simple or message (overrides SLACK_LAYOUT)
    #[arg(long)]
    layout: Option<LayoutKind>,

    /// HTTP timeout in seconds (overrides SLACK_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Minimum severity printed to the console
    #[arg(long, default_value = "debug")]
    console_level: Severity,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let pipeline = Arc::new(LogPipeline::new());
    pipeline.attach(Arc::new(ConsoleSink::stderr(
        args.console_level,
        Arc::new(SimpleLayout),
    )));

    // Initialize tracing; every admitted event goes through the pipeline
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,log2slack=trace"));
    tracing_subscriber::registry()
        .with(PipelineLayer::new(pipeline.clone()).with_filter(filter))
        .init();

    let settings = SinkSettings::from_env()?.merge(SinkSettingsOverride {
        threshold: args.level,
        endpoint: args.endpoint.clone(),
        layout: args.layout,
        timeout: args.timeout_secs.map(Duration::from_secs),
    });

    let status = Arc::new(StatusManager::new());
    let sink = Arc::new(settings.build_sink(status.clone())?);

    let errors = sink.activate();
    if errors > 0 {
        status.print_to(io::stderr())?;
        error!("Slack sink is not active: {} configuration error(s)", errors);
        std::process::exit(1);
    }
    debug!("Slack sink active");

    pipeline.attach(sink);

    match args.severity {
        Severity::Trace => trace!(target: "log2slack", "{}", args.message),
        Severity::Debug => debug!(target: "log2slack", "{}", args.message),
        Severity::Info => info!(target: "log2slack", "{}", args.message),
        Severity::Warn => warn!(target: "log2slack", "{}", args.message),
        Severity::Error => error!(target: "log2slack", "{}", args.message),
    }

    Ok(())
}

//! Configuration module for the Slack log sink
//!
//! This module handles loading sink settings from environment variables.
//! Absent values stay unset so that `SlackSink::activate` can report each
//! one; values that are present but malformed are rejected here.

use crate::errors::{SinkError, SinkResult};
use crate::event_sink::{
    DeliveryClient, HttpDeliveryClient, HttpDeliveryConfig, LayoutKind, SlackSink,
    DEFAULT_TIMEOUT,
};
use crate::status::StatusManager;
use crate::types::Severity;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const ENV_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
pub const ENV_LOG_LEVEL: &str = "SLACK_LOG_LEVEL";
pub const ENV_LAYOUT: &str = "SLACK_LAYOUT";
pub const ENV_TIMEOUT_SECS: &str = "SLACK_TIMEOUT_SECS";

/// Settings for building a Slack sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSettings {
    pub threshold: Option<Severity>,
    pub endpoint: Option<String>,
    pub layout: Option<LayoutKind>,
    /// Request timeout of the HTTP delivery client
    pub timeout: Duration,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            threshold: None,
            endpoint: None,
            layout: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SinkSettings {
    /// Load settings from environment variables
    ///
    /// # Environment Variables
    ///
    /// - `SLACK_WEBHOOK_URL`: webhook endpoint
    /// - `SLACK_LOG_LEVEL`: minimum severity forwarded (trace, debug, info, warn, error)
    /// - `SLACK_LAYOUT`: "simple" or "message"
    /// - `SLACK_TIMEOUT_SECS`: HTTP timeout in seconds (default: 10)
    pub fn from_env() -> SinkResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> SinkResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENV_WEBHOOK_URL).filter(|s| !s.trim().is_empty());
        // The webhook URL embeds its secret, only log whether it is set
        debug!("Webhook URL configured: {}", endpoint.is_some());

        let threshold = lookup(ENV_LOG_LEVEL)
            .map(|s| {
                s.parse::<Severity>()
                    .map_err(|e| SinkError::config(format!("{}: {}", ENV_LOG_LEVEL, e)))
            })
            .transpose()?;
        debug!("Threshold from env: {:?}", threshold);

        let layout = lookup(ENV_LAYOUT)
            .map(|s| {
                s.parse::<LayoutKind>()
                    .map_err(|e| SinkError::config(format!("{}: {}", ENV_LAYOUT, e)))
            })
            .transpose()?;
        debug!("Layout from env: {:?}", layout);

        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    SinkError::config(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        ENV_TIMEOUT_SECS, raw
                    ))
                })?;
                if secs == 0 {
                    return Err(SinkError::config(format!(
                        "{} must be greater than zero",
                        ENV_TIMEOUT_SECS
                    )));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            threshold,
            endpoint,
            layout,
            timeout,
        })
    }

    /// Overlay explicitly given values on top of these settings
    pub fn merge(mut self, overrides: SinkSettingsOverride) -> Self {
        if overrides.threshold.is_some() {
            self.threshold = overrides.threshold;
        }
        if overrides.endpoint.is_some() {
            self.endpoint = overrides.endpoint;
        }
        if overrides.layout.is_some() {
            self.layout = overrides.layout;
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        self
    }

    /// Build an HTTP-backed sink from these settings. The sink is not activated.
    pub fn build_sink(&self, status: Arc<StatusManager>) -> SinkResult<SlackSink> {
        let client = HttpDeliveryClient::new(HttpDeliveryConfig {
            timeout: self.timeout,
        })?;
        Ok(self.build_sink_with_client(Arc::new(client), status))
    }

    /// Build a sink delivering through the given client. The sink is not activated.
    pub fn build_sink_with_client(
        &self,
        client: Arc<dyn DeliveryClient>,
        status: Arc<StatusManager>,
    ) -> SlackSink {
        let mut sink = SlackSink::new(client, status);
        sink.set_threshold(self.threshold);
        sink.set_endpoint(self.endpoint.clone());
        sink.set_layout(self.layout.map(LayoutKind::build));
        info!(
            "Built slack sink (threshold: {:?}, layout: {:?})",
            self.threshold, self.layout
        );
        sink
    }
}

/// Values given explicitly, e.g. on the command line
#[derive(Debug, Clone, Default)]
pub struct SinkSettingsOverride {
    pub threshold: Option<Severity>,
    pub endpoint: Option<String>,
    pub layout: Option<LayoutKind>,
    pub timeout: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_leaves_everything_unset() {
        let settings = SinkSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, SinkSettings::default());
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_full_environment() {
        let settings = SinkSettings::from_lookup(lookup(&[
            (ENV_WEBHOOK_URL, "https://hooks.slack.test/services/T0/B0/X"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LAYOUT, "simple"),
            (ENV_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();

        assert_eq!(
            settings.endpoint.as_deref(),
            Some("https://hooks.slack.test/services/T0/B0/X")
        );
        assert_eq!(settings.threshold, Some(Severity::Warn));
        assert_eq!(settings.layout, Some(LayoutKind::Simple));
        assert_eq!(settings.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let err = SinkSettings::from_lookup(lookup(&[(ENV_LOG_LEVEL, "fatal")])).unwrap_err();
        assert!(err.to_string().contains("SLACK_LOG_LEVEL"));
    }

    #[test]
    fn test_invalid_layout_is_rejected() {
        let err = SinkSettings::from_lookup(lookup(&[(ENV_LAYOUT, "xml")])).unwrap_err();
        assert!(err.to_string().contains("SLACK_LAYOUT"));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        assert!(SinkSettings::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).is_err());
        assert!(SinkSettings::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")])).is_err());
    }

    #[test]
    fn test_blank_webhook_counts_as_unset() {
        let settings = SinkSettings::from_lookup(lookup(&[(ENV_WEBHOOK_URL, "  ")])).unwrap();
        assert_eq!(settings.endpoint, None);
    }

    #[test]
    fn test_merge_overrides() {
        let settings = SinkSettings::from_lookup(lookup(&[
            (ENV_WEBHOOK_URL, "https://env.test"),
            (ENV_LOG_LEVEL, "info"),
        ]))
        .unwrap()
        .merge(SinkSettingsOverride {
            threshold: Some(Severity::Error),
            ..Default::default()
        });

        assert_eq!(settings.threshold, Some(Severity::Error));
        assert_eq!(settings.endpoint.as_deref(), Some("https://env.test"));
    }

    #[test]
    fn test_built_sink_reports_missing_fields() {
        let status = Arc::new(StatusManager::new());
        let settings = SinkSettings {
            endpoint: Some("https://example.test".to_string()),
            ..Default::default()
        };
        let sink = settings.build_sink(status.clone()).unwrap();

        assert_eq!(sink.activate(), 2);
        assert_eq!(status.error_count(), 2);
        assert!(!sink.is_active());
    }

    #[test]
    fn test_built_sink_activates_when_complete() {
        let status = Arc::new(StatusManager::new());
        let settings = SinkSettings {
            threshold: Some(Severity::Error),
            endpoint: Some("https://example.test".to_string()),
            layout: Some(LayoutKind::Message),
            ..Default::default()
        };
        let sink = settings.build_sink(status.clone()).unwrap();

        assert_eq!(sink.activate(), 0);
        assert!(sink.is_active());
        assert_eq!(sink.threshold(), Some(Severity::Error));
    }
}

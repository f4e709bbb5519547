use reqwest::blocking::Client;
use serde::Serialize;
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::debug;

use crate::errors::{SinkError, SinkResult};

/// Default request timeout for webhook delivery
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackMessage {
    pub text: String,
}

/// What happened to a delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The endpoint answered, with any status
    Response {
        status: u16,
        reason: String,
        body: String,
    },
    /// No response: connect, timeout or request building failure
    Failed { error: String },
}

impl DeliveryOutcome {
    pub fn response<R: Into<String>, B: Into<String>>(status: u16, reason: R, body: B) -> Self {
        Self::Response {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    pub fn failed<E: Into<String>>(error: E) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Response { status, .. } if (200..300).contains(status))
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response { status, reason, body } => {
                write!(f, "{}", status)?;
                if !reason.is_empty() {
                    write!(f, " {}", reason)?;
                }
                if !body.is_empty() {
                    write!(f, ": {}", body)?;
                }
                Ok(())
            }
            Self::Failed { error } => write!(f, "error: {}", error),
        }
    }
}

/// The outbound call seam used by the Slack sink
///
/// Implementations must not panic or propagate transport errors: every
/// failure is reported as [`DeliveryOutcome::Failed`].
pub trait DeliveryClient: Send + Sync {
    fn send(&self, endpoint: &str, payload: &str) -> DeliveryOutcome;
}

/// HTTP delivery client configuration
#[derive(Debug, Clone)]
pub struct HttpDeliveryConfig {
    pub timeout: Duration,
}

impl Default for HttpDeliveryConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Run `f` where the blocking reqwest client is allowed to run
///
/// The blocking client panics when it is built or driven from a thread
/// that has a tokio runtime entered, and `spawn_blocking` threads still
/// expose the runtime handle. In that case `f` runs on a separate plain
/// thread and the caller waits for it.
fn outside_runtime<T, F>(f: F) -> thread::Result<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    if tokio::runtime::Handle::try_current().is_err() {
        return Ok(f());
    }
    thread::scope(|s| s.spawn(f).join())
}

/// Blocking HTTP client posting `{"text": ...}` to a webhook URL
///
/// Runs on the caller's thread, or on a short-lived helper thread when
/// the caller is inside a tokio runtime.
#[derive(Clone)]
pub struct HttpDeliveryClient {
    client: Client,
}

impl HttpDeliveryClient {
    /// Create a new HTTP delivery client
    pub fn new(config: HttpDeliveryConfig) -> SinkResult<Self> {
        let timeout = config.timeout;
        let client = outside_runtime(move || Client::builder().timeout(timeout).build())
            .map_err(|_| SinkError::config("HTTP client construction panicked"))??;
        debug!("Built webhook HTTP client with timeout {:?}", timeout);
        Ok(Self { client })
    }

    fn send_blocking(&self, endpoint: &str, payload: &str) -> DeliveryOutcome {
        let message = SlackMessage {
            text: payload.to_string(),
        };

        let response = match self.client.post(endpoint).json(&message).send() {
            Ok(resp) => resp,
            Err(e) => return DeliveryOutcome::failed(e.to_string()),
        };

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        match response.text() {
            Ok(body) => DeliveryOutcome::response(status.as_u16(), reason, body),
            Err(e) => DeliveryOutcome::failed(format!(
                "{} {} with unreadable body: {}",
                status.as_u16(),
                reason,
                e
            )),
        }
    }
}

impl DeliveryClient for HttpDeliveryClient {
    fn send(&self, endpoint: &str, payload: &str) -> DeliveryOutcome {
        outside_runtime(|| self.send_blocking(endpoint, payload))
            .unwrap_or_else(|_| DeliveryOutcome::failed("delivery thread panicked"))
    }
}

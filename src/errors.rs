//! Error types for the Slack log sink
//! Setup failures only: dispatch and activation never return these

use thiserror::Error;

/// Main error type for building and configuring the sink
#[derive(Error, Debug)]
pub enum SinkError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The HTTP client could not be built
    #[error("HTTP client error")]
    Client(#[from] reqwest::Error),
}

/// Result type alias for convenience
pub type SinkResult<T> = std::result::Result<T, SinkError>;

impl SinkError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

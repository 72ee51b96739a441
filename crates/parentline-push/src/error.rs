//! Error types for the push channel.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Result type alias for push channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Push channel errors.
///
/// Transport failures after the channel is running are never returned to
/// the caller; they show up as [`crate::PushEvent::Disconnected`].
#[derive(Debug, Error)]
pub enum Error {
    /// WebSocket protocol or transport error.
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    /// Invalid push server URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The session token cannot be sent as a header value.
    #[error("Invalid header: {0}")]
    InvalidHeader(#[from] tungstenite::http::header::InvalidHeaderValue),

    /// Frame encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The background task has stopped.
    #[error("Push channel closed")]
    Closed,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<tungstenite::Error> for Error {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

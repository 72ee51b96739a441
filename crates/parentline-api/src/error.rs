//! Error types for the REST client.

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for REST operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error body returned by the services.
///
/// Every field is optional because the services are not consistent about
/// which ones they fill in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    /// Short error title (e.g. "No teachers available").
    #[serde(default)]
    pub error: Option<String>,
    /// Longer human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Machine-readable code (e.g. `NO_TEACHERS`).
    #[serde(default)]
    pub code: Option<String>,
    /// Remediation hint for the user.
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl ErrorBody {
    /// Returns the most descriptive message available.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Returns true if the body carries the given code.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

/// REST client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level HTTP error that is not a connectivity failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{endpoint} returned {status}{}", summary_suffix(.body.as_ref()))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Full URL of the request.
        endpoint: String,
        /// Parsed error body, if the service sent one.
        body: Option<ErrorBody>,
    },

    /// No response was received at all.
    #[error("Service unreachable at {endpoint}: {reason}")]
    Unreachable {
        /// Full URL of the request.
        endpoint: String,
        /// Underlying transport error.
        reason: String,
    },

    /// URL building error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading local files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Response did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn summary_suffix(body: Option<&ErrorBody>) -> String {
    body.and_then(ErrorBody::summary)
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl Error {
    /// Converts a `reqwest` send error, separating "no response" from the rest.
    ///
    /// Any failure while the request is in flight (refused, reset, closed
    /// before a status line, timed out) means no response was received.
    /// Builder errors stay [`Error::Http`].
    #[must_use]
    pub fn from_send(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_request() || err.is_connect() || err.is_timeout() {
            Self::Unreachable {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        } else {
            Self::Http(err)
        }
    }

    /// Returns true if no response was received.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// Returns the HTTP status, if the service answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the structured error body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Returns the service-supplied message, falling back to the display form.
    #[must_use]
    pub fn service_message(&self) -> String {
        self.body()
            .and_then(ErrorBody::summary)
            .map_or_else(|| self.to_string(), ToString::to_string)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_summary_prefers_error() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"error":"No teachers available","message":"ignored","code":"NO_TEACHERS"}"#,
        )
        .unwrap();
        assert_eq!(body.summary(), Some("No teachers available"));
        assert!(body.has_code("NO_TEACHERS"));
    }

    #[test]
    fn test_error_body_falls_back_to_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"Content required"}"#).unwrap();
        assert_eq!(body.summary(), Some("Content required"));
        assert!(body.code.is_none());
    }

    #[test]
    fn test_status_display_includes_endpoint() {
        let err = Error::Status {
            status: 404,
            endpoint: "http://localhost/api/conversations/start".into(),
            body: None,
        };
        assert_eq!(
            err.to_string(),
            "http://localhost/api/conversations/start returned 404"
        );
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unreachable());
    }

    #[test]
    fn test_service_message() {
        let err = Error::Status {
            status: 400,
            endpoint: "http://localhost/messages".into(),
            body: Some(ErrorBody {
                message: Some("Receiver is required".into()),
                ..ErrorBody::default()
            }),
        };
        assert_eq!(err.service_message(), "Receiver is required");
    }
}

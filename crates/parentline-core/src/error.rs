//! Error types for the core library.

use parentline_api::UserId;
use thiserror::Error;

/// Body codes meaning the requested peer does not exist.
const PEER_NOT_FOUND_CODES: [&str; 3] = ["RECIPIENT_NOT_FOUND", "USER_NOT_FOUND", "PEER_NOT_FOUND"];

/// Body code meaning no peer can currently be assigned.
const NO_PEERS_CODE: &str = "NO_TEACHERS";

/// Errors that can occur in core operations outside the messaging taxonomies.
#[derive(Debug, Error)]
pub enum Error {
    /// REST client error.
    #[error("API error: {0}")]
    Api(#[from] parentline_api::Error),

    /// Push channel error.
    #[error("Push error: {0}")]
    Push(#[from] parentline_push::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to load conversation data. Cached state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The conversation summary list could not be loaded.
    #[error("Could not load conversations: {0}")]
    Summary(String),

    /// The history with one peer could not be loaded.
    #[error("Could not load messages with {peer}: {message}")]
    History {
        /// Peer whose history was requested.
        peer: UserId,
        /// Failure description.
        message: String,
    },

    /// The peer directory could not be loaded.
    #[error("Could not load contacts: {0}")]
    Peers(String),
}

/// Failure to send a message. The compose draft is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// Uploading the attachments failed; nothing was persisted.
    #[error("Attachment upload failed: {0}")]
    UploadFailed(String),

    /// Persisting the message failed.
    #[error("Message could not be sent: {0}")]
    PersistFailed(String),
}

/// Compose draft errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    /// The attachment cap is reached.
    #[error("At most {cap} attachments can be added")]
    AttachmentLimit {
        /// Maximum number of attachments.
        cap: usize,
    },
}

/// Failure to start a new conversation.
///
/// Each variant needs different guidance for the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartChatError {
    /// Local validation failed; no request was made.
    #[error("{0}")]
    ValidationFailed(String),

    /// The service has no peer to assign right now.
    #[error("{message}")]
    NoPeersAvailable {
        /// Service error text followed by its suggestion.
        message: String,
    },

    /// The start endpoint is missing or misrouted.
    #[error("Chat service unavailable at {endpoint}")]
    EndpointUnavailable {
        /// Full URL that was attempted.
        endpoint: String,
    },

    /// The requested peer does not exist.
    #[error("Contact {peer} was not found. The contact list has been refreshed.")]
    PeerNotFound {
        /// Requested peer.
        peer: UserId,
    },

    /// No response was received.
    #[error("Cannot reach the chat service at {endpoint}. Check your connection.")]
    NetworkUnreachable {
        /// Full URL that was attempted.
        endpoint: String,
    },

    /// The service rejected the request.
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Service-supplied message.
        message: String,
    },

    /// Anything not classifiable above.
    #[error("Could not start the conversation: {0}")]
    RequestSetupFailure(String),
}

impl StartChatError {
    /// Classifies a REST error from the start endpoint.
    #[must_use]
    pub fn classify(err: &parentline_api::Error, peer: &UserId) -> Self {
        use parentline_api::Error as ApiError;

        match err {
            ApiError::Status {
                status,
                endpoint,
                body,
            } => {
                let body = body.clone().unwrap_or_default();
                match *status {
                    503 if body.has_code(NO_PEERS_CODE) => Self::NoPeersAvailable {
                        message: match (body.summary(), body.suggestion.as_deref()) {
                            (Some(error), Some(suggestion)) => format!("{error}. {suggestion}"),
                            (Some(error), None) => error.to_string(),
                            (None, Some(suggestion)) => suggestion.to_string(),
                            (None, None) => "No contacts are available right now".to_string(),
                        },
                    },
                    404 if PEER_NOT_FOUND_CODES.iter().any(|code| body.has_code(code)) => {
                        Self::PeerNotFound { peer: peer.clone() }
                    }
                    404 => Self::EndpointUnavailable {
                        endpoint: endpoint.clone(),
                    },
                    status => Self::Rejected {
                        status,
                        message: err.service_message(),
                    },
                }
            }
            ApiError::Unreachable { endpoint, .. } => Self::NetworkUnreachable {
                endpoint: endpoint.clone(),
            },
            other => Self::RequestSetupFailure(other.to_string()),
        }
    }

    /// Returns true if this error should trigger a peer directory refresh.
    #[must_use]
    pub const fn refreshes_directory(&self) -> bool {
        matches!(self, Self::PeerNotFound { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parentline_api::ErrorBody;

    use super::*;

    fn status(status: u16, body: Option<ErrorBody>) -> parentline_api::Error {
        parentline_api::Error::Status {
            status,
            endpoint: "http://localhost:5000/api/conversations/start".into(),
            body,
        }
    }

    fn peer() -> UserId {
        UserId::from("t1")
    }

    #[test]
    fn test_no_teachers_concatenates_suggestion() {
        let err = status(
            503,
            Some(ErrorBody {
                error: Some("No teachers available".into()),
                code: Some("NO_TEACHERS".into()),
                suggestion: Some("Try later".into()),
                ..ErrorBody::default()
            }),
        );
        let classified = StartChatError::classify(&err, &peer());
        assert_eq!(
            classified,
            StartChatError::NoPeersAvailable {
                message: "No teachers available. Try later".into()
            }
        );
        assert_eq!(classified.to_string(), "No teachers available. Try later");
    }

    #[test]
    fn test_no_teachers_without_suggestion() {
        let err = status(
            503,
            Some(ErrorBody {
                error: Some("No teachers available".into()),
                code: Some("NO_TEACHERS".into()),
                ..ErrorBody::default()
            }),
        );
        assert_eq!(
            StartChatError::classify(&err, &peer()).to_string(),
            "No teachers available"
        );
    }

    #[test]
    fn test_plain_503_is_rejected() {
        let err = status(503, None);
        assert!(matches!(
            StartChatError::classify(&err, &peer()),
            StartChatError::Rejected { status: 503, .. }
        ));
    }

    #[test]
    fn test_404_without_code_is_endpoint_unavailable() {
        let classified = StartChatError::classify(&status(404, None), &peer());
        assert!(
            classified
                .to_string()
                .contains("http://localhost:5000/api/conversations/start")
        );
        assert!(!classified.refreshes_directory());
    }

    #[test]
    fn test_404_with_peer_code_is_peer_not_found() {
        let err = status(
            404,
            Some(ErrorBody {
                code: Some("RECIPIENT_NOT_FOUND".into()),
                ..ErrorBody::default()
            }),
        );
        let classified = StartChatError::classify(&err, &peer());
        assert_eq!(classified, StartChatError::PeerNotFound { peer: peer() });
        assert!(classified.refreshes_directory());
    }

    #[test]
    fn test_400_is_rejected_with_service_message() {
        let err = status(
            400,
            Some(ErrorBody {
                message: Some("Content is required".into()),
                ..ErrorBody::default()
            }),
        );
        assert_eq!(
            StartChatError::classify(&err, &peer()),
            StartChatError::Rejected {
                status: 400,
                message: "Content is required".into()
            }
        );
    }

    #[test]
    fn test_unreachable() {
        let err = parentline_api::Error::Unreachable {
            endpoint: "http://localhost:5000/api/conversations/start".into(),
            reason: "connection refused".into(),
        };
        assert!(matches!(
            StartChatError::classify(&err, &peer()),
            StartChatError::NetworkUnreachable { .. }
        ));
    }

    #[test]
    fn test_other_errors_are_setup_failures() {
        let err = parentline_api::Error::InvalidResponse("truncated".into());
        assert!(matches!(
            StartChatError::classify(&err, &peer()),
            StartChatError::RequestSetupFailure(_)
        ));
    }
}

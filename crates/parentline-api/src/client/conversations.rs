//! Conversation service endpoints.

use serde::Deserialize;

use super::{Client, check_status};
use crate::error::{Error, ErrorBody, Result};
use crate::model::{ConversationSummary, Message, NewMessage, StartConversation, UserId};

/// Path of the conversation start endpoint.
pub const START_PATH: &str = "/conversations/start";

/// Answer of the start endpoint on a 2xx status.
#[derive(Debug, Deserialize)]
struct StartResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    data: Option<Message>,
    #[serde(flatten)]
    error: ErrorBody,
}

const fn default_success() -> bool {
    true
}

impl Client {
    /// Fetches the conversation summary list.
    pub(super) async fn conversations(&self) -> Result<Vec<ConversationSummary>> {
        let url = self.url("/conversations", None)?;
        let summaries: Vec<ConversationSummary> =
            self.execute(self.http.get(url.clone()), &url).await?;
        tracing::debug!(count = summaries.len(), "loaded conversation summaries");
        Ok(summaries)
    }

    /// Fetches the ordered history with one peer.
    pub(super) async fn history(&self, peer: &UserId) -> Result<Vec<Message>> {
        let url = self.url("/conversations", Some(peer.as_str()))?;
        let messages: Vec<Message> = self.execute(self.http.get(url.clone()), &url).await?;
        tracing::debug!(peer = %peer, count = messages.len(), "loaded history");
        Ok(messages)
    }

    /// Persists a message.
    pub(super) async fn post_message(&self, message: &NewMessage) -> Result<Message> {
        let url = self.url("/messages", None)?;
        self.execute(self.http.post(url.clone()).json(message), &url)
            .await
    }

    /// Starts a conversation with its first message.
    ///
    /// A 2xx answer with `success: false` is reported as [`Error::Status`]
    /// so callers classify it like any other rejection.
    pub(super) async fn start(&self, request: &StartConversation) -> Result<Message> {
        let url = self.url(START_PATH, None)?;
        let response = self
            .send(self.http.post(url.clone()).json(request), &url)
            .await?;
        let response = check_status(response, &url).await?;
        let status = response.status().as_u16();

        let answer: StartResponse = response.json().await?;
        match answer {
            StartResponse {
                success: true,
                data: Some(message),
                ..
            } => {
                tracing::info!(peer = %request.recipient_id, "conversation started");
                Ok(message)
            }
            StartResponse {
                success: true,
                data: None,
                ..
            } => Err(Error::InvalidResponse(
                "start response carried no message".into(),
            )),
            StartResponse { error, .. } => Err(Error::Status {
                status,
                endpoint: url.to_string(),
                body: Some(error),
            }),
        }
    }
}

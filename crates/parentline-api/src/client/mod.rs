//! HTTP client for the conversation, upload and peer directory services.

mod conversations;
mod directory;
mod upload;

pub use conversations::START_PATH;

use std::future::Future;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, ErrorBody, Result};
use crate::file::LocalFile;
use crate::model::{
    Attachment, ConversationSummary, Message, NewMessage, Payload, StartConversation, User, UserId,
};
use crate::session::Session;

/// Operations the messaging engine needs from the services.
///
/// [`Client`] is the HTTP implementation; the engine is generic over this
/// trait so it can run against in-memory fakes.
pub trait MessagingApi {
    /// `GET /conversations`: the conversation summary list.
    fn list_conversations(&self) -> impl Future<Output = Result<Vec<ConversationSummary>>> + Send;

    /// `GET /conversations/{peer}`: ordered history with one peer.
    fn fetch_history(&self, peer: &UserId) -> impl Future<Output = Result<Vec<Message>>> + Send;

    /// `POST /messages`: persists a message and returns it.
    fn send_message(&self, message: &NewMessage) -> impl Future<Output = Result<Message>> + Send;

    /// `POST /conversations/start`: creates a conversation and its first message.
    fn start_conversation(
        &self,
        request: &StartConversation,
    ) -> impl Future<Output = Result<Message>> + Send;

    /// `POST /uploads`: uploads files as one batch, all-or-nothing.
    fn upload(&self, files: &[LocalFile]) -> impl Future<Output = Result<Vec<Attachment>>> + Send;

    /// Role-scoped peer directory listing.
    fn list_peers(&self) -> impl Future<Output = Result<Vec<User>>> + Send;

    /// Full URL of an endpoint, for diagnostics.
    fn endpoint_url(&self, path: &str) -> String;
}

/// REST client bound to one session.
#[derive(Debug, Clone)]
pub struct Client {
    config: ApiConfig,
    session: Session,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig, session: Session) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config,
            session,
            http: builder.build()?,
        })
    }

    /// Returns the session this client authenticates with.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Joins `path` onto the base URL, then appends `id` as one encoded segment.
    fn url(&self, path: &str, id: Option<&str>) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::InvalidConfig(format!(
                    "base URL cannot be a base: {}",
                    self.config.base_url
                ))
            })?;
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Sends an authenticated request and decodes a successful JSON body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> Result<T> {
        let response = self.send(request, url).await?;
        let response = check_status(response, url).await?;
        let payload: Payload<T> = response.json().await?;
        Ok(payload.into_inner())
    }

    /// Sends an authenticated request, mapping "no response" separately.
    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response> {
        tracing::debug!(endpoint = %url, "request");
        request
            .header(reqwest::header::AUTHORIZATION, self.session.bearer())
            .send()
            .await
            .map_err(|e| Error::from_send(url.as_str(), e))
    }
}

/// Converts a non-success response into [`Error::Status`].
async fn check_status(response: Response, url: &Url) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorBody>(&text).ok();
    tracing::debug!(endpoint = %url, status = status.as_u16(), "service rejected request");

    Err(Error::Status {
        status: status.as_u16(),
        endpoint: url.to_string(),
        body,
    })
}

impl MessagingApi for Client {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        self.conversations().await
    }

    async fn fetch_history(&self, peer: &UserId) -> Result<Vec<Message>> {
        self.history(peer).await
    }

    async fn send_message(&self, message: &NewMessage) -> Result<Message> {
        self.post_message(message).await
    }

    async fn start_conversation(&self, request: &StartConversation) -> Result<Message> {
        self.start(request).await
    }

    async fn upload(&self, files: &[LocalFile]) -> Result<Vec<Attachment>> {
        self.upload_files(files).await
    }

    async fn list_peers(&self) -> Result<Vec<User>> {
        self.peers().await
    }

    fn endpoint_url(&self, path: &str) -> String {
        self.url(path, None)
            .map_or_else(|_| format!("{}{path}", self.config.base_url), String::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn client(base: &str) -> Client {
        Client::new(
            ApiConfig::new(base).unwrap(),
            Session::new("p1", Role::Parent, "tok"),
        )
        .unwrap()
    }

    #[test]
    fn test_url_joins_segments() {
        let client = client("http://localhost:5000/api");
        let url = client.url("conversations", Some("t1")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/conversations/t1");
    }

    #[test]
    fn test_url_with_trailing_slash_base() {
        let client = client("http://localhost:5000/api/");
        let url = client.url("/users/teachers", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/users/teachers");
    }

    #[test]
    fn test_url_encodes_peer_id() {
        let client = client("http://localhost:5000");
        let url = client.url("conversations", Some("a b/c")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/conversations/a%20b%2Fc");
    }

    #[test]
    fn test_endpoint_url() {
        let client = client("http://localhost:5000/api");
        assert_eq!(
            client.endpoint_url("/conversations/start"),
            "http://localhost:5000/api/conversations/start"
        );
    }
}

//! Send orchestration on top of the engine.
//!
//! A [`Messenger`] owns the API handle, the [`Engine`] and the compose
//! draft. Every network failure is converted into one of the error
//! taxonomies before it reaches the caller.

mod draft;

use parentline_api::{
    Attachment, Message, MessagingApi, NewMessage, START_PATH, Session, StartConversation, User,
    UserId,
};
use parentline_push::PushEvent;

pub use draft::ComposeDraft;

use crate::engine::{Conversation, Engine, EngineOptions};
use crate::error::{LoadError, SendError, StartChatError};

/// Messaging front end for one session.
#[derive(Debug)]
pub struct Messenger<A> {
    api: A,
    engine: Engine,
    draft: ComposeDraft,
    sending: bool,
    last_send_error: Option<SendError>,
}

impl<A: MessagingApi> Messenger<A> {
    /// Creates a messenger for `session`.
    #[must_use]
    pub fn new(api: A, session: &Session, options: EngineOptions) -> Self {
        Self {
            api,
            engine: Engine::new(session.user_id().clone(), options),
            draft: ComposeDraft::new(options.attachment_cap),
            sending: false,
            last_send_error: None,
        }
    }

    /// Returns the API handle.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Returns the engine state.
    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns the engine for signal handling such as [`Engine::take_autoscroll`].
    pub const fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Returns the compose draft.
    #[must_use]
    pub const fn draft(&self) -> &ComposeDraft {
        &self.draft
    }

    /// Returns the compose draft for editing.
    pub const fn draft_mut(&mut self) -> &mut ComposeDraft {
        &mut self.draft
    }

    /// Returns true while a send is in flight.
    #[must_use]
    pub const fn is_sending(&self) -> bool {
        self.sending
    }

    /// Returns the error of the last failed send, cleared by the next attempt.
    #[must_use]
    pub const fn last_send_error(&self) -> Option<&SendError> {
        self.last_send_error.as_ref()
    }

    /// Loads the conversation summary list.
    ///
    /// # Errors
    ///
    /// See [`Engine::hydrate`].
    pub async fn hydrate(&mut self) -> Result<(), LoadError> {
        self.engine.hydrate(&self.api).await
    }

    /// Loads the peer directory into the engine's cache.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Peers`]; the previous cache is kept.
    pub async fn load_peers(&mut self) -> Result<(), LoadError> {
        self.engine.set_peers_loading();
        match self.api.list_peers().await {
            Ok(peers) => {
                tracing::info!(count = peers.len(), "peer directory loaded");
                self.engine.set_peers(peers);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load peer directory");
                let err = LoadError::Peers(e.service_message());
                self.engine.set_peers_failed(&err);
                Err(err)
            }
        }
    }

    /// Opens the conversation with `peer` and clears the draft.
    ///
    /// # Errors
    ///
    /// See [`Engine::open_conversation`].
    pub async fn open_conversation(&mut self, peer: UserId) -> Result<(), LoadError> {
        self.draft.clear();
        self.last_send_error = None;
        self.engine.open_conversation(&self.api, peer).await
    }

    /// Closes the open conversation.
    pub fn close_conversation(&mut self) {
        self.draft.clear();
        self.engine.close_conversation();
    }

    /// Removes a pending attachment; out-of-range indexes are ignored.
    pub fn remove_local_attachment(&mut self, index: usize) {
        if let Some(file) = self.draft.remove_attachment(index) {
            tracing::debug!(name = %file.name, "attachment removed");
        }
    }

    /// Sends the draft to the open conversation.
    ///
    /// Uploads attachments first, then persists the message and applies the
    /// persisted copy to the engine. Returns `Ok(None)` without any request
    /// when no conversation is open or the draft is blank.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`]; the draft is kept for resubmission.
    pub async fn send(&mut self) -> Result<Option<Message>, SendError> {
        let Some(peer) = self.engine.open_peer().cloned() else {
            return Ok(None);
        };
        if self.draft.is_blank() {
            return Ok(None);
        }

        self.sending = true;
        self.last_send_error = None;
        let result = self.deliver(peer).await;
        self.sending = false;

        match result {
            Ok(message) => {
                self.draft.clear();
                self.engine.apply_incoming(message.clone());
                Ok(Some(message))
            }
            Err(e) => {
                tracing::warn!(error = %e, "send failed");
                self.last_send_error = Some(e.clone());
                Err(e)
            }
        }
    }

    async fn deliver(&self, peer: UserId) -> Result<Message, SendError> {
        let attachments: Vec<Attachment> = if self.draft.attachments().is_empty() {
            Vec::new()
        } else {
            self.api
                .upload(self.draft.attachments())
                .await
                .map_err(|e| SendError::UploadFailed(e.service_message()))?
        };

        let request = NewMessage {
            content: self.draft.content.clone(),
            receiver_id: peer,
            attachments,
        };
        let message = self
            .api
            .send_message(&request)
            .await
            .map_err(|e| SendError::PersistFailed(e.service_message()))?;
        tracing::debug!(id = ?message.id, peer = %request.receiver_id, "message persisted");
        Ok(message)
    }

    /// Starts a conversation with `peer` and opens it.
    ///
    /// # Errors
    ///
    /// Returns a classified [`StartChatError`]. A
    /// [`StartChatError::PeerNotFound`] refreshes the peer directory first.
    pub async fn start_conversation(
        &mut self,
        peer: &UserId,
        first_message: &str,
    ) -> Result<Conversation, StartChatError> {
        if peer.is_empty() {
            return Err(StartChatError::ValidationFailed(
                "Select a contact to message".into(),
            ));
        }
        if first_message.trim().is_empty() {
            return Err(StartChatError::ValidationFailed(
                "Message cannot be empty".into(),
            ));
        }

        let request = StartConversation {
            recipient_id: peer.clone(),
            content: first_message.to_string(),
        };
        let message = match self.api.start_conversation(&request).await {
            Ok(message) => message,
            Err(e) => {
                let err = StartChatError::classify(&e, peer);
                tracing::warn!(
                    peer = %peer,
                    endpoint = %self.api.endpoint_url(START_PATH),
                    error = %e,
                    "start conversation failed"
                );
                if err.refreshes_directory() {
                    if let Err(refresh) = self.load_peers().await {
                        tracing::warn!(error = %refresh, "directory refresh failed");
                    }
                }
                return Err(err);
            }
        };

        let user = self.started_peer(peer, &message);
        self.draft.clear();
        Ok(self.engine.open_started(user, message))
    }

    fn started_peer(&self, peer: &UserId, message: &Message) -> User {
        if let Some(user) = self.engine.peer(peer) {
            return user.clone();
        }
        message
            .receiver
            .user()
            .filter(|u| &u.id == peer)
            .cloned()
            .unwrap_or_else(|| User::placeholder(peer.clone()))
    }

    /// Feeds one push channel event into the engine.
    ///
    /// Returns true if visible state may have changed.
    pub async fn handle_push_event(&mut self, event: PushEvent) -> bool {
        match event {
            PushEvent::Message(message) => self.engine.apply_incoming(message),
            PushEvent::Connected { reconnect: true } if self.engine.options().resync_on_reconnect => {
                if let Err(e) = self.engine.resync(&self.api).await {
                    tracing::warn!(error = %e, "resync after reconnect failed");
                }
                true
            }
            PushEvent::Connected { reconnect } => {
                tracing::info!(reconnect, "push channel ready");
                false
            }
            PushEvent::Disconnected(reason) => {
                tracing::debug!(reason = %reason, "push channel down");
                false
            }
        }
    }

    /// Discards all session state at logout.
    pub fn reset(&mut self) {
        self.draft.clear();
        self.sending = false;
        self.last_send_error = None;
        self.engine.reset();
    }
}

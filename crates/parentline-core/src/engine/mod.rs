//! Conversation reconciliation engine.
//!
//! The [`Engine`] owns the conversation set and the open timeline and merges
//! REST-loaded history, locally sent messages and pushed messages into them.
//! It holds no API handle; operations that load data borrow one.

mod conversation;
mod timeline;

use std::collections::{HashMap, HashSet};

use parentline_api::{Message, MessageId, MessagingApi, User, UserId};

pub use conversation::{Conversation, ConversationSet};
use timeline::Timeline;

use crate::error::LoadError;

/// Default maximum number of attachments per message.
pub const DEFAULT_ATTACHMENT_CAP: usize = 5;

/// Engine behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Count unread pushes locally and clear the count on open.
    pub local_unread_tracking: bool,
    /// Reload the summary list and open history after a reconnect.
    pub resync_on_reconnect: bool,
    /// Maximum attachments per message.
    pub attachment_cap: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            local_unread_tracking: false,
            resync_on_reconnect: true,
            attachment_cap: DEFAULT_ATTACHMENT_CAP,
        }
    }
}

impl EngineOptions {
    /// Enables or disables local unread tracking.
    #[must_use]
    pub const fn local_unread_tracking(mut self, enabled: bool) -> Self {
        self.local_unread_tracking = enabled;
        self
    }

    /// Enables or disables resync after reconnect.
    #[must_use]
    pub const fn resync_on_reconnect(mut self, enabled: bool) -> Self {
        self.resync_on_reconnect = enabled;
        self
    }

    /// Sets the attachment cap.
    #[must_use]
    pub const fn attachment_cap(mut self, cap: usize) -> Self {
        self.attachment_cap = cap;
        self
    }
}

/// Progress of a load operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Never requested.
    #[default]
    Idle,
    /// Request in flight.
    Loading,
    /// Loaded successfully.
    Loaded,
    /// The last attempt failed; calling again retries.
    Failed(String),
}

impl LoadState {
    /// Returns true while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns the failure message, if the last attempt failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Per-session conversation state.
#[derive(Debug, Clone)]
pub struct Engine {
    local: UserId,
    options: EngineOptions,
    conversations: ConversationSet,
    timeline: Timeline,
    open_peer: Option<UserId>,
    /// Ids applied per peer. Session-scoped: grows until [`Engine::reset`].
    seen: HashMap<UserId, HashSet<MessageId>>,
    summary_state: LoadState,
    timeline_state: LoadState,
    peers_state: LoadState,
    peers: Vec<User>,
    autoscroll: bool,
}

impl Engine {
    /// Creates an empty engine for the local user.
    #[must_use]
    pub fn new(local: UserId, options: EngineOptions) -> Self {
        Self {
            local,
            options,
            conversations: ConversationSet::new(),
            timeline: Timeline::default(),
            open_peer: None,
            seen: HashMap::new(),
            summary_state: LoadState::Idle,
            timeline_state: LoadState::Idle,
            peers_state: LoadState::Idle,
            peers: Vec::new(),
            autoscroll: false,
        }
    }

    /// Returns the local user's id.
    #[must_use]
    pub const fn local_user(&self) -> &UserId {
        &self.local
    }

    /// Returns the engine options.
    #[must_use]
    pub const fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Returns all conversations.
    #[must_use]
    pub const fn conversations(&self) -> &ConversationSet {
        &self.conversations
    }

    /// Returns the conversation with `peer`.
    #[must_use]
    pub fn conversation(&self, peer: &UserId) -> Option<&Conversation> {
        self.conversations.get(peer)
    }

    /// Returns the open conversation's messages.
    #[must_use]
    pub fn timeline(&self) -> &[Message] {
        self.timeline.messages()
    }

    /// Returns the peer of the open conversation.
    #[must_use]
    pub const fn open_peer(&self) -> Option<&UserId> {
        self.open_peer.as_ref()
    }

    /// Returns the summary list load state.
    #[must_use]
    pub const fn summary_state(&self) -> &LoadState {
        &self.summary_state
    }

    /// Returns the open timeline load state.
    #[must_use]
    pub const fn timeline_state(&self) -> &LoadState {
        &self.timeline_state
    }

    /// Returns the peer directory load state.
    #[must_use]
    pub const fn peers_state(&self) -> &LoadState {
        &self.peers_state
    }

    /// Returns the cached peer directory.
    #[must_use]
    pub fn peers(&self) -> &[User] {
        &self.peers
    }

    /// Looks up a peer in the directory cache.
    #[must_use]
    pub fn peer(&self, id: &UserId) -> Option<&User> {
        self.peers.iter().find(|p| &p.id == id)
    }

    /// Consumes the pending scroll-to-end signal.
    pub fn take_autoscroll(&mut self) -> bool {
        std::mem::take(&mut self.autoscroll)
    }

    /// Applies a message from the push channel or a confirmed send.
    ///
    /// Returns false if the message was rejected or already applied.
    pub fn apply_incoming(&mut self, message: Message) -> bool {
        if message.is_self_addressed() {
            tracing::warn!(id = ?message.id, "rejecting self-addressed message");
            return false;
        }

        let other = message.other_party(&self.local).clone();
        if let Some(id) = &message.id {
            if !self.seen.entry(other.clone()).or_default().insert(id.clone()) {
                tracing::debug!(id = %id, peer = %other, "duplicate message ignored");
                return false;
            }
        }

        let is_open = self.open_peer.as_ref() == Some(&other);
        let incoming = message.sender_id() != &self.local;

        if is_open && self.timeline.push(message.clone()) {
            self.autoscroll = true;
        }

        let fallback = self.resolve_peer(&other, &message);
        let conversation = self
            .conversations
            .entry_or_insert_with(other.clone(), || fallback);
        conversation.observe(&message);
        if is_open {
            conversation.unread_count = 0;
        } else if self.options.local_unread_tracking && incoming {
            conversation.unread_count = conversation.unread_count.saturating_add(1);
        }

        tracing::debug!(peer = %other, open = is_open, "applied message");
        true
    }

    /// Loads the conversation summary list.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Summary`] and leaves the set untouched if the
    /// request fails.
    pub async fn hydrate<A: MessagingApi>(&mut self, api: &A) -> Result<(), LoadError> {
        self.summary_state = LoadState::Loading;
        match api.list_conversations().await {
            Ok(summaries) => {
                let count = summaries.len();
                self.conversations.merge_summaries(summaries);
                self.summary_state = LoadState::Loaded;
                tracing::info!(count, "conversations loaded");
                Ok(())
            }
            Err(e) => {
                let err = LoadError::Summary(e.service_message());
                tracing::warn!(error = %e, "failed to load conversations");
                self.summary_state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Opens the conversation with `peer`, replacing the timeline with its history.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::History`] if the history cannot be loaded; the
    /// timeline stays empty and the conversation set is unchanged.
    pub async fn open_conversation<A: MessagingApi>(
        &mut self,
        api: &A,
        peer: UserId,
    ) -> Result<(), LoadError> {
        self.open_peer = Some(peer.clone());
        self.timeline.clear();
        self.timeline_state = LoadState::Loading;

        match api.fetch_history(&peer).await {
            Ok(history) => {
                let seen = self.seen.entry(peer.clone()).or_default();
                seen.extend(history.iter().filter_map(|m| m.id.clone()));
                self.timeline.replace(history);
                self.timeline_state = LoadState::Loaded;
                self.autoscroll = true;

                if self.options.local_unread_tracking {
                    if let Some(conversation) = self.conversations.get_mut(&peer) {
                        conversation.unread_count = 0;
                    }
                }
                tracing::info!(peer = %peer, count = self.timeline.len(), "conversation opened");
                Ok(())
            }
            Err(e) => {
                let err = LoadError::History {
                    peer: peer.clone(),
                    message: e.service_message(),
                };
                tracing::warn!(peer = %peer, error = %e, "failed to load history");
                self.timeline_state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Closes the open conversation.
    pub fn close_conversation(&mut self) {
        self.open_peer = None;
        self.timeline.clear();
        self.timeline_state = LoadState::Idle;
    }

    /// Reconciles after a reconnect.
    ///
    /// Reloads the summary list and appends messages of the open
    /// conversation that are not in the timeline yet.
    ///
    /// # Errors
    ///
    /// Returns the first load failure; the other reload is still attempted.
    pub async fn resync<A: MessagingApi>(&mut self, api: &A) -> Result<(), LoadError> {
        let summary = self.hydrate(api).await;

        let history = match self.open_peer.clone() {
            Some(peer) => match api.fetch_history(&peer).await {
                Ok(history) => {
                    let appended = self.append_missing(&peer, history);
                    tracing::info!(peer = %peer, appended, "resynced open conversation");
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!(peer = %peer, error = %e, "resync history failed");
                    Err(LoadError::History {
                        peer,
                        message: e.service_message(),
                    })
                }
            },
            None => Ok(()),
        };

        summary.and(history)
    }

    /// Discards all session state.
    pub fn reset(&mut self) {
        self.conversations.clear();
        self.timeline.clear();
        self.open_peer = None;
        self.seen.clear();
        self.summary_state = LoadState::Idle;
        self.timeline_state = LoadState::Idle;
        self.peers_state = LoadState::Idle;
        self.peers.clear();
        self.autoscroll = false;
        tracing::info!("session state discarded");
    }

    pub(crate) fn set_peers_loading(&mut self) {
        self.peers_state = LoadState::Loading;
    }

    pub(crate) fn set_peers(&mut self, peers: Vec<User>) {
        self.peers = peers;
        self.peers_state = LoadState::Loaded;
    }

    pub(crate) fn set_peers_failed(&mut self, err: &LoadError) {
        self.peers_state = LoadState::Failed(err.to_string());
    }

    /// Records a conversation created by the start endpoint and opens it.
    ///
    /// An existing entry for the peer is updated in place. If that peer is
    /// already open, the message is appended to the loaded history.
    pub(crate) fn open_started(&mut self, peer: User, message: Message) -> Conversation {
        let peer_id = peer.id.clone();
        if let Some(id) = &message.id {
            self.seen.entry(peer_id.clone()).or_default().insert(id.clone());
        }

        let conversation = self
            .conversations
            .entry_or_insert_with(peer_id.clone(), || peer.clone());
        if conversation.peer.role.is_none() && peer.role.is_some() {
            conversation.peer = peer;
        }
        conversation.observe(&message);
        conversation.unread_count = 0;
        let conversation = conversation.clone();

        if self.open_peer.as_ref() == Some(&peer_id) {
            self.timeline.push(message);
        } else {
            self.open_peer = Some(peer_id);
            self.timeline.replace(vec![message]);
        }
        self.timeline_state = LoadState::Loaded;
        self.autoscroll = true;
        conversation
    }

    fn append_missing(&mut self, peer: &UserId, history: Vec<Message>) -> usize {
        let mut appended = 0;
        for message in history {
            if message.id.as_ref().is_some_and(|id| self.timeline.contains(id)) {
                continue;
            }
            if let Some(id) = &message.id {
                self.seen.entry(peer.clone()).or_default().insert(id.clone());
            }
            if let Some(conversation) = self.conversations.get_mut(peer) {
                conversation.observe(&message);
            }
            if self.timeline.push(message) {
                appended += 1;
            }
        }
        if appended > 0 {
            self.autoscroll = true;
        }
        appended
    }

    /// Picks the best known user record for `id`.
    fn resolve_peer(&self, id: &UserId, message: &Message) -> User {
        if let Some(user) = self.peer(id) {
            return user.clone();
        }
        [&message.sender, &message.receiver]
            .into_iter()
            .filter_map(parentline_api::Participant::user)
            .find(|u| &u.id == id)
            .cloned()
            .unwrap_or_else(|| User::placeholder(id.clone()))
    }
}

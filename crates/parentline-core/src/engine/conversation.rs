//! Conversation entries keyed by peer.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use parentline_api::{ConversationSummary, Message, User, UserId};

/// One conversation with a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// The other party.
    pub peer: User,
    /// Most recent message observed.
    pub last_message: Option<Message>,
    /// Unread count.
    pub unread_count: u32,
}

impl Conversation {
    /// Creates an empty conversation with `peer`.
    #[must_use]
    pub const fn new(peer: User) -> Self {
        Self {
            peer,
            last_message: None,
            unread_count: 0,
        }
    }

    /// Returns the peer's id.
    #[must_use]
    pub const fn peer_id(&self) -> &UserId {
        &self.peer.id
    }

    /// Replaces the last message unless `message` is older.
    ///
    /// Returns true if the last message changed.
    pub fn observe(&mut self, message: &Message) -> bool {
        let newer = self
            .last_message
            .as_ref()
            .is_none_or(|last| message.created_at >= last.created_at);
        if newer {
            self.last_message = Some(message.clone());
        }
        newer
    }
}

impl From<ConversationSummary> for Conversation {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            peer: summary.peer.into_user(),
            last_message: summary.last_message,
            unread_count: summary.unread_count,
        }
    }
}

/// All conversations of the session, at most one per peer.
#[derive(Debug, Clone, Default)]
pub struct ConversationSet {
    entries: HashMap<UserId, Conversation>,
}

impl ConversationSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the conversation with `peer`.
    #[must_use]
    pub fn get(&self, peer: &UserId) -> Option<&Conversation> {
        self.entries.get(peer)
    }

    pub(crate) fn get_mut(&mut self, peer: &UserId) -> Option<&mut Conversation> {
        self.entries.get_mut(peer)
    }

    /// Returns true if a conversation with `peer` exists.
    #[must_use]
    pub fn contains(&self, peer: &UserId) -> bool {
        self.entries.contains_key(peer)
    }

    /// Number of conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no conversations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over conversations in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Conversation> {
        self.entries.values()
    }

    /// Conversations sorted by last message time, newest first.
    ///
    /// Conversations without a message sort last, by peer name.
    #[must_use]
    pub fn by_recency(&self) -> Vec<&Conversation> {
        let mut list: Vec<_> = self.entries.values().collect();
        list.sort_by(|a, b| {
            let a_time = a.last_message.as_ref().map(|m| m.created_at);
            let b_time = b.last_message.as_ref().map(|m| m.created_at);
            b_time
                .cmp(&a_time)
                .then_with(|| a.peer.name.cmp(&b.peer.name))
        });
        list
    }

    /// Returns the entry for `peer`, creating it with `make_peer` if absent.
    pub(crate) fn entry_or_insert_with(
        &mut self,
        peer: UserId,
        make_peer: impl FnOnce() -> User,
    ) -> &mut Conversation {
        self.entries
            .entry(peer)
            .or_insert_with(|| Conversation::new(make_peer()))
    }

    /// Merges a server summary list.
    ///
    /// Unread counts from the server win; last messages only move forward in
    /// time; entries the server did not mention are kept.
    pub(crate) fn merge_summaries(&mut self, summaries: Vec<ConversationSummary>) {
        for summary in summaries {
            let incoming = Conversation::from(summary);
            match self.entries.entry(incoming.peer_id().clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(incoming);
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    if incoming.peer.role.is_some() || existing.peer.role.is_none() {
                        existing.peer = incoming.peer;
                    }
                    if let Some(message) = &incoming.last_message {
                        existing.observe(message);
                    }
                    existing.unread_count = incoming.unread_count;
                }
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

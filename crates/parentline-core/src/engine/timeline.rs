//! The message sequence of the open conversation.

use std::collections::HashSet;

use parentline_api::{Message, MessageId};

/// Messages of the open conversation in arrival order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Timeline {
    messages: Vec<Message>,
    ids: HashSet<MessageId>,
}

impl Timeline {
    /// Returns the messages.
    #[must_use]
    pub(crate) fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if a message with `id` is present.
    #[must_use]
    pub(crate) fn contains(&self, id: &MessageId) -> bool {
        self.ids.contains(id)
    }

    /// Appends a message unless one with the same id is present.
    pub(crate) fn push(&mut self, message: Message) -> bool {
        if let Some(id) = &message.id {
            if !self.ids.insert(id.clone()) {
                return false;
            }
        }
        self.messages.push(message);
        true
    }

    pub(crate) fn replace(&mut self, messages: Vec<Message>) {
        self.clear();
        for message in messages {
            self.push(message);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
        self.ids.clear();
    }
}

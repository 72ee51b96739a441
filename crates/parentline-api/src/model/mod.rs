//! Wire data model shared by the REST client and the push channel.

mod conversation;
mod message;
mod user;

pub use conversation::ConversationSummary;
pub use message::{Attachment, Message, MessageId, MessageStatus, NewMessage, StartConversation};
pub use user::{Participant, Role, User, UserId};

use serde::Deserialize;

/// A response payload that may or may not be wrapped in a `data` envelope.
///
/// Some endpoints answer with the bare value, others with
/// `{"success": true, "data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Payload<T> {
    Bare(T),
    Wrapped {
        #[serde(alias = "files", alias = "attachments")]
        data: T,
    },
}

impl<T> Payload<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Bare(value) | Self::Wrapped { data: value } => value,
        }
    }
}

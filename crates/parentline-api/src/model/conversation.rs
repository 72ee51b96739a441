//! Conversation summary as returned by `GET /conversations`.

use serde::{Deserialize, Serialize};

use super::{Message, Participant};

/// One entry of the conversation summary list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// The other party of the conversation.
    #[serde(alias = "user", alias = "participant")]
    pub peer: Participant,
    /// Most recent message, if the service sent one.
    #[serde(default)]
    pub last_message: Option<Message>,
    /// Unread messages as counted by the service.
    #[serde(default)]
    pub unread_count: u32,
}

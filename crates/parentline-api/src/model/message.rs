//! Message and attachment types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Participant, UserId};

/// Server-assigned message identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Creates a message id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Delivery status of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Persisted by the service.
    #[default]
    Sent,
    /// Delivered to the receiver.
    Delivered,
    /// Read by the receiver.
    Read,
}

/// A stable reference to an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Download URL issued by the upload service.
    pub url: String,
    /// Original file name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
}

/// A message between two accounts. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Server-assigned id; absent for a message that was never persisted.
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    /// Sending account.
    pub sender: Participant,
    /// Receiving account.
    pub receiver: Participant,
    /// Text body; may be empty when attachments are present.
    #[serde(default)]
    pub content: String,
    /// Uploaded attachments.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Delivery status.
    #[serde(default)]
    pub status: MessageStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time the receiver read the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Returns the sender id.
    #[must_use]
    pub const fn sender_id(&self) -> &UserId {
        self.sender.id()
    }

    /// Returns the receiver id.
    #[must_use]
    pub const fn receiver_id(&self) -> &UserId {
        self.receiver.id()
    }

    /// Returns the party that is not `local`.
    #[must_use]
    pub fn other_party(&self, local: &UserId) -> &UserId {
        if self.sender_id() == local {
            self.receiver_id()
        } else {
            self.sender_id()
        }
    }

    /// Returns true if sender and receiver are the same account.
    #[must_use]
    pub fn is_self_addressed(&self) -> bool {
        self.sender_id() == self.receiver_id()
    }
}

/// Body of `POST /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    /// Text body.
    pub content: String,
    /// Receiving account.
    pub receiver_id: UserId,
    /// Attachments already uploaded.
    pub attachments: Vec<Attachment>,
}

/// Body of `POST /conversations/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversation {
    /// Peer to start the conversation with.
    pub recipient_id: UserId,
    /// First message text.
    pub content: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PUSHED: &str = r#"{
        "_id": "m1",
        "sender": "p1",
        "receiver": {"_id": "t1", "name": "Ms. Amina", "role": "teacher"},
        "content": "Hello",
        "attachments": [],
        "createdAt": "2024-01-01T00:00:00Z"
    }"#;

    #[test]
    fn test_message_deserialization() {
        let message: Message = serde_json::from_str(PUSHED).unwrap();
        assert_eq!(message.id, Some(MessageId::from("m1")));
        assert_eq!(message.sender_id().as_str(), "p1");
        assert_eq!(message.receiver_id().as_str(), "t1");
        assert_eq!(message.status, MessageStatus::Sent);
        assert!(message.read_at.is_none());
    }

    #[test]
    fn test_other_party() {
        let message: Message = serde_json::from_str(PUSHED).unwrap();
        assert_eq!(message.other_party(&UserId::from("p1")).as_str(), "t1");
        assert_eq!(message.other_party(&UserId::from("t1")).as_str(), "p1");
        assert!(!message.is_self_addressed());
    }

    #[test]
    fn test_attachment_camel_case() {
        let attachment: Attachment = serde_json::from_str(
            r#"{"url":"https://files.example/a.pdf","name":"a.pdf","mimeType":"application/pdf"}"#,
        )
        .unwrap();
        assert_eq!(attachment.mime_type, "application/pdf");
    }

    #[test]
    fn test_new_message_wire_shape() {
        let body = NewMessage {
            content: "See attached".into(),
            receiver_id: UserId::from("t1"),
            attachments: Vec::new(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["receiverId"], "t1");
        assert_eq!(json["content"], "See attached");
        assert!(json["attachments"].as_array().unwrap().is_empty());
    }
}

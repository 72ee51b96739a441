//! JSON frame codec.
//!
//! Every frame is a text frame of the form `{"event": <name>, "data": <payload>}`.

use parentline_api::{Message, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Client → server: register this connection under a user id.
pub const JOIN_EVENT: &str = "join";

/// Server → client: a message involving the joined user.
pub const NEW_MESSAGE_EVENT: &str = "newMessage";

/// Raw frame envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Event name.
    pub event: String,
    /// Event payload.
    #[serde(default)]
    pub data: Value,
}

/// Decoded server event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// A new message was delivered.
    NewMessage(Message),
    /// An event this client does not handle.
    Unknown(String),
}

/// Encodes a `join` frame for `user`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_join(user: &UserId) -> Result<String> {
    let frame = Frame {
        event: JOIN_EVENT.to_string(),
        data: Value::String(user.to_string()),
    };
    Ok(serde_json::to_string(&frame)?)
}

/// Encodes a `newMessage` frame.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_new_message(message: &Message) -> Result<String> {
    let frame = Frame {
        event: NEW_MESSAGE_EVENT.to_string(),
        data: serde_json::to_value(message)?,
    };
    Ok(serde_json::to_string(&frame)?)
}

/// Decodes a server text frame.
///
/// # Errors
///
/// Returns an error if the envelope or the `newMessage` payload is malformed.
pub fn decode(text: &str) -> Result<ServerEvent> {
    let frame: Frame = serde_json::from_str(text)?;
    match frame.event.as_str() {
        NEW_MESSAGE_EVENT => Ok(ServerEvent::NewMessage(serde_json::from_value(frame.data)?)),
        _ => Ok(ServerEvent::Unknown(frame.event)),
    }
}

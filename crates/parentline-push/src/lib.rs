//! # parentline-push
//!
//! Persistent push channel for parentline message delivery.
//!
//! One [`PushHandle`] owns one WebSocket connection per session. The socket
//! lives on a background task that authenticates with the session's bearer
//! token, sends `join` after every (re)connect and forwards `newMessage`
//! frames as [`PushEvent::Message`]. Delivery is at-most-once: messages
//! pushed while disconnected are not replayed.
//!
//! ```ignore
//! use parentline_push::{PushClient, PushConfig, PushEvent};
//!
//! let mut handle = PushClient::connect(PushConfig::new("ws://localhost:5000")?, &session)?;
//! while let Some(event) = handle.next_event().await {
//!     if let PushEvent::Message(message) = event {
//!         println!("{}: {}", message.sender_id(), message.content);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
pub mod config;
mod error;
pub mod frame;

pub use client::{PushClient, PushEvent, PushHandle};
pub use config::{PushConfig, PushConfigBuilder};
pub use error::{Error, Result};
pub use frame::ServerEvent;

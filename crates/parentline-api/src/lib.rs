//! # parentline-api
//!
//! Typed REST client for the parentline services: conversations, message
//! persistence, batch uploads and the role-scoped peer directory.
//!
//! ## Quick Start
//!
//! ```ignore
//! use parentline_api::{ApiConfig, Client, MessagingApi, Role, Session};
//!
//! #[tokio::main]
//! async fn main() -> parentline_api::Result<()> {
//!     let session = Session::new("p1", Role::Parent, "token");
//!     let client = Client::new(ApiConfig::new("http://localhost:5000/api")?, session)?;
//!
//!     for summary in client.list_conversations().await? {
//!         println!("{}: {} unread", summary.peer.id(), summary.unread_count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`client`]: the [`MessagingApi`] trait and its HTTP implementation
//! - [`model`]: wire types shared with the push channel
//! - [`file`]: local files selected for upload

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
mod error;
pub mod file;
pub mod model;
pub mod session;

pub use client::{Client, MessagingApi, START_PATH};
pub use config::{ApiConfig, ApiConfigBuilder, DEFAULT_PEER_DIRECTORY_PATH};
pub use error::{Error, ErrorBody, Result};
pub use file::LocalFile;
pub use model::{
    Attachment, ConversationSummary, Message, MessageId, MessageStatus, NewMessage, Participant,
    Role, StartConversation, User, UserId,
};
pub use session::Session;

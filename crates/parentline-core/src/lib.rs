//! # parentline-core
//!
//! Core messaging logic for parentline.
//!
//! This crate provides:
//! - The conversation reconciliation [`Engine`]: one entry per peer, the
//!   open timeline in arrival order, de-duplication by message id
//! - The [`Messenger`] send orchestrator: upload, persist, apply; and the
//!   start-conversation flow with its [`StartChatError`] taxonomy
//! - [`Settings`] loaded from the user's config directory
//!
//! All state lives in plain structs mutated through `&mut self`. Callers run
//! a single event loop that feeds [`parentline_push::PushEvent`]s and user
//! actions into the [`Messenger`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod engine;
mod error;
pub mod messenger;
pub mod settings;

pub use engine::{
    Conversation, ConversationSet, DEFAULT_ATTACHMENT_CAP, Engine, EngineOptions, LoadState,
};
pub use error::{DraftError, Error, LoadError, Result, SendError, StartChatError};
pub use messenger::{ComposeDraft, Messenger};
pub use parentline_api::Session;
pub use settings::Settings;

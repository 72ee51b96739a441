//! Plain-text output.

use parentline_api::{Message, MessagingApi, UserId};
use parentline_core::{ComposeDraft, Engine, Messenger};

fn display_name(engine: &Engine, id: &UserId) -> String {
    engine
        .conversation(id)
        .map(|c| c.peer.name.clone())
        .or_else(|| engine.peer(id).map(|p| p.name.clone()))
        .unwrap_or_else(|| id.to_string())
}

pub fn conversations(engine: &Engine) {
    if let Some(error) = engine.summary_state().error() {
        println!("! {error} (/list to retry)");
    }
    let list = engine.conversations().by_recency();
    if list.is_empty() {
        println!("No conversations yet. /peers lists who you can message.");
        return;
    }
    for conversation in list {
        let marker = if engine.open_peer() == Some(conversation.peer_id()) {
            '>'
        } else {
            ' '
        };
        let unread = match conversation.unread_count {
            0 => String::new(),
            n => format!(" [{n} unread]"),
        };
        let preview = conversation
            .last_message
            .as_ref()
            .map(|m| m.content.lines().next().unwrap_or_default().to_string())
            .unwrap_or_default();
        println!(
            "{marker} {} ({}){unread}  {preview}",
            conversation.peer.name,
            conversation.peer_id()
        );
    }
}

pub fn peers(engine: &Engine) {
    if let Some(error) = engine.peers_state().error() {
        println!("! {error}");
    }
    for peer in engine.peers() {
        let role = peer.role.map(|r| r.as_str()).unwrap_or_default();
        println!("  {} ({}) {role}", peer.name, peer.id);
    }
}

pub fn message(engine: &Engine, message: &Message) {
    let who = if message.sender_id() == engine.local_user() {
        "you".to_string()
    } else {
        display_name(engine, message.sender_id())
    };
    println!(
        "[{}] {who}: {}",
        message.created_at.format("%Y-%m-%d %H:%M"),
        message.content
    );
    for attachment in &message.attachments {
        println!("    📎 {} <{}>", attachment.name, attachment.url);
    }
}

pub fn timeline(engine: &mut Engine) {
    let Some(peer) = engine.open_peer().cloned() else {
        return;
    };
    println!("--- {} ---", display_name(engine, &peer));
    if let Some(error) = engine.timeline_state().error() {
        println!("! {error} (/open {peer} to retry)");
    }
    for m in engine.timeline() {
        message(engine, m);
    }
    engine.take_autoscroll();
}

/// Prints what a push changed: the new line of the open conversation, or a notice.
pub fn pushed(engine: &mut Engine, pushed: &Message) {
    if engine.take_autoscroll() {
        message(engine, pushed);
        return;
    }
    let other = pushed.other_party(engine.local_user()).clone();
    println!("* new message from {}", display_name(engine, &other));
}

pub fn draft(draft: &ComposeDraft) {
    for (index, file) in draft.attachments().iter().enumerate() {
        println!("  [{index}] {} ({} bytes)", file.name, file.len());
    }
}

pub fn status<A: MessagingApi>(messenger: &Messenger<A>) {
    if let Some(error) = messenger.last_send_error() {
        println!("! {error}");
    }
}

//! In-memory [`MessagingApi`] that records every call.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use parentline_api::{
    Attachment, ConversationSummary, Error, ErrorBody, LocalFile, Message, MessageStatus,
    MessagingApi, NewMessage, Participant, Result, StartConversation, User, UserId,
};

pub const LOCAL: &str = "p1";
pub const BASE_URL: &str = "http://localhost:5000/api";

/// A recorded API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListConversations,
    FetchHistory(UserId),
    SendMessage(NewMessage),
    Start(StartConversation),
    Upload(Vec<String>),
    ListPeers,
}

/// A canned failure.
#[derive(Debug, Clone)]
pub enum Failure {
    Status(u16, Option<ErrorBody>),
    Unreachable,
}

impl Failure {
    fn into_error(self, path: &str) -> Error {
        let endpoint = format!("{BASE_URL}{path}");
        match self {
            Self::Status(status, body) => Error::Status {
                status,
                endpoint,
                body,
            },
            Self::Unreachable => Error::Unreachable {
                endpoint,
                reason: "connection refused".into(),
            },
        }
    }
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    summaries: Vec<ConversationSummary>,
    summary_failure: Option<Failure>,
    histories: HashMap<UserId, Vec<Message>>,
    history_failure: Option<Failure>,
    upload_failure: Option<Failure>,
    send_failure: Option<Failure>,
    start_failure: Option<Failure>,
    peers: Vec<User>,
    sent: u32,
}

/// Recording fake of the REST services.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    pub fn with_summaries(self, summaries: Vec<ConversationSummary>) -> Self {
        self.state.lock().unwrap().summaries = summaries;
        self
    }

    pub fn set_summaries(&self, summaries: Vec<ConversationSummary>) {
        self.state.lock().unwrap().summaries = summaries;
    }

    pub fn with_history(self, peer: &str, messages: Vec<Message>) -> Self {
        self.set_history(peer, messages);
        self
    }

    pub fn set_history(&self, peer: &str, messages: Vec<Message>) {
        self.state
            .lock()
            .unwrap()
            .histories
            .insert(peer.into(), messages);
    }

    pub fn with_peers(self, peers: Vec<User>) -> Self {
        self.state.lock().unwrap().peers = peers;
        self
    }

    pub fn fail_summary(&self, failure: Failure) {
        self.state.lock().unwrap().summary_failure = Some(failure);
    }

    pub fn fail_history(&self, failure: Failure) {
        self.state.lock().unwrap().history_failure = Some(failure);
    }

    pub fn fail_upload(&self, failure: Failure) {
        self.state.lock().unwrap().upload_failure = Some(failure);
    }

    pub fn fail_send(&self, failure: Failure) {
        self.state.lock().unwrap().send_failure = Some(failure);
    }

    pub fn fail_start(&self, failure: Failure) {
        self.state.lock().unwrap().start_failure = Some(failure);
    }

    pub fn recover(&self) {
        let mut state = self.state.lock().unwrap();
        state.summary_failure = None;
        state.history_failure = None;
        state.upload_failure = None;
        state.send_failure = None;
        state.start_failure = None;
    }
}

impl MessagingApi for FakeApi {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListConversations);
        match state.summary_failure.clone() {
            Some(failure) => Err(failure.into_error("/conversations")),
            None => Ok(state.summaries.clone()),
        }
    }

    async fn fetch_history(&self, peer: &UserId) -> Result<Vec<Message>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::FetchHistory(peer.clone()));
        match state.history_failure.clone() {
            Some(failure) => Err(failure.into_error(&format!("/conversations/{peer}"))),
            None => Ok(state.histories.get(peer).cloned().unwrap_or_default()),
        }
    }

    async fn send_message(&self, message: &NewMessage) -> Result<Message> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::SendMessage(message.clone()));
        if let Some(failure) = state.send_failure.clone() {
            return Err(failure.into_error("/messages"));
        }
        state.sent += 1;
        let mut persisted = message_at(
            &format!("srv-{}", state.sent),
            LOCAL,
            message.receiver_id.as_str(),
            1_000 + i64::from(state.sent),
        );
        persisted.content.clone_from(&message.content);
        persisted.attachments.clone_from(&message.attachments);
        Ok(persisted)
    }

    async fn start_conversation(&self, request: &StartConversation) -> Result<Message> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Start(request.clone()));
        if let Some(failure) = state.start_failure.clone() {
            return Err(failure.into_error("/conversations/start"));
        }
        let mut message = message_at("m1", LOCAL, request.recipient_id.as_str(), 0);
        message.content.clone_from(&request.content);
        Ok(message)
    }

    async fn upload(&self, files: &[LocalFile]) -> Result<Vec<Attachment>> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::Upload(files.iter().map(|f| f.name.clone()).collect()));
        if let Some(failure) = state.upload_failure.clone() {
            return Err(failure.into_error("/uploads"));
        }
        Ok(files
            .iter()
            .map(|f| Attachment {
                url: format!("https://files.example/{}", f.name),
                name: f.name.clone(),
                mime_type: f.mime_type.clone(),
            })
            .collect())
    }

    async fn list_peers(&self) -> Result<Vec<User>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListPeers);
        Ok(state.peers.clone())
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{BASE_URL}{path}")
    }
}

/// A persisted message with a timestamp `secs` after 2024-01-01.
pub fn message_at(id: &str, from: &str, to: &str, secs: i64) -> Message {
    Message {
        id: Some(id.into()),
        sender: Participant::from(from),
        receiver: Participant::from(to),
        content: format!("text {id}"),
        attachments: Vec::new(),
        status: MessageStatus::Sent,
        created_at: Utc.timestamp_opt(1_704_067_200 + secs, 0).unwrap(),
        read_at: None,
    }
}

pub fn summary(peer: User, last: Option<Message>, unread: u32) -> ConversationSummary {
    ConversationSummary {
        peer: Participant::User(peer),
        last_message: last,
        unread_count: unread,
    }
}

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use teloxide::types::{ChatId, FileId};
use teloxide::{ApiError, RequestError};

use super::directory::{DirectoryError, Recipient, RecipientDirectory};
use super::transport::{ChoiceButton, MessageTransport, TransportError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Text(ChatId, String),
    Photo(ChatId, FileId, Option<String>),
    Document(ChatId, FileId, Option<String>),
    Choice(ChatId, String, Vec<&'static str>),
}

impl Sent {
    pub fn target(&self) -> ChatId {
        match self {
            Sent::Text(t, _) | Sent::Photo(t, ..) | Sent::Document(t, ..) | Sent::Choice(t, ..) => *t,
        }
    }
}

/// Records every call; chats in `failing` error out, chats in `stalled` never answer in time.
#[derive(Default)]
pub struct FakeTransport {
    pub sent: Mutex<Vec<Sent>>,
    failing: HashSet<ChatId>,
    stalled: HashSet<ChatId>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, chat: ChatId) -> Self {
        self.failing.insert(chat);
        self
    }

    pub fn stalled(mut self, chat: ChatId) -> Self {
        self.stalled.insert(chat);
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat: ChatId) -> Vec<Sent> {
        self.sent().into_iter().filter(|s| s.target() == chat).collect()
    }

    async fn record(&self, call: Sent) -> Result<(), TransportError> {
        let target = call.target();
        self.sent.lock().unwrap().push(call);
        if self.stalled.contains(&target) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        if self.failing.contains(&target) {
            return Err(RequestError::Api(ApiError::BotBlocked).into());
        }
        Ok(())
    }
}

#[async_trait]
impl MessageTransport for FakeTransport {
    async fn send_text(&self, target: ChatId, text: &str) -> Result<(), TransportError> {
        self.record(Sent::Text(target, text.to_string())).await
    }

    async fn send_photo(&self, target: ChatId, file: &FileId, caption: Option<&str>) -> Result<(), TransportError> {
        self.record(Sent::Photo(target, file.clone(), caption.map(str::to_string))).await
    }

    async fn send_document(&self, target: ChatId, file: &FileId, caption: Option<&str>) -> Result<(), TransportError> {
        self.record(Sent::Document(target, file.clone(), caption.map(str::to_string))).await
    }

    async fn send_choice(&self, target: ChatId, text: &str, buttons: &[ChoiceButton]) -> Result<(), TransportError> {
        let tokens = buttons.iter().map(|b| b.token).collect();
        self.record(Sent::Choice(target, text.to_string(), tokens)).await
    }
}

pub struct FakeDirectory {
    recipients: Result<Vec<Recipient>, String>,
}

impl FakeDirectory {
    pub fn with(ids: &[i64]) -> Self {
        Self { recipients: Ok(ids.iter().map(|&id| Recipient { target: ChatId(id) }).collect()) }
    }

    pub fn broken(reason: &str) -> Self {
        Self { recipients: Err(reason.to_string()) }
    }
}

#[async_trait]
impl RecipientDirectory for FakeDirectory {
    async fn fetch_all_recipients(&self) -> Result<Vec<Recipient>, DirectoryError> {
        self.recipients.clone().map_err(DirectoryError)
    }
}

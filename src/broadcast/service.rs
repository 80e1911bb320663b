use std::sync::Arc;

use teloxide::types::{ChatId, UserId};

use super::dispatcher::{DeliveryReport, FanoutDispatcher};
use super::draft::DraftMessage;
use super::session::{SessionKey, SessionTracker};
use super::transport::{ChoiceButton, MessageTransport};
use crate::translation::TranslationManager;

pub const CONFIRM_TOKEN: &str = "broadcast_confirm";
pub const CANCEL_TOKEN: &str = "broadcast_cancel";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BroadcastAction {
    Confirm,
    Cancel,
}

impl BroadcastAction {
    pub fn from_token(data: &str) -> Option<Self> {
        match data {
            CONFIRM_TOKEN => Some(Self::Confirm),
            CANCEL_TOKEN => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Who triggered an event and where to answer them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operator {
    pub user: UserId,
    pub chat: ChatId,
    pub language: String,
}

impl Operator {
    pub fn session_key(&self) -> SessionKey {
        SessionKey { chat: self.chat, user: self.user }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum InvokeOutcome {
    AccessDenied,
    AwaitingDraft,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ChoiceOutcome {
    Sent(DeliveryReport),
    NothingPending,
    Canceled,
}

/// Drives an operator through invoke, compose, confirm and dispatch.
///
/// Events arriving out of order are ignored or answered with a short status;
/// none of them is an error. Replies to the operator are best effort.
pub struct BroadcastService {
    admin_id: UserId,
    sessions: SessionTracker,
    dispatcher: FanoutDispatcher,
    transport: Arc<dyn MessageTransport>,
    texts: Arc<TranslationManager>,
}

impl BroadcastService {
    pub fn new(
        admin_id: UserId,
        dispatcher: FanoutDispatcher,
        transport: Arc<dyn MessageTransport>,
        texts: Arc<TranslationManager>,
    ) -> Self {
        Self {
            admin_id,
            sessions: SessionTracker::new(),
            dispatcher,
            transport,
            texts,
        }
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub async fn handle_invoke(&self, op: &Operator) -> InvokeOutcome {
        if op.user != self.admin_id {
            log::info!("Broadcast denied for user {}", op.user.0);
            self.notify(op, "broadcast_access_denied").await;
            return InvokeOutcome::AccessDenied;
        }

        self.sessions.begin_draft_wait(op.session_key()).await;
        self.notify(op, "broadcast_send_prompt").await;
        InvokeOutcome::AwaitingDraft
    }

    /// Returns false when this operator was not waiting for a draft; nothing is sent then.
    pub async fn handle_candidate(&self, op: &Operator, draft: DraftMessage) -> bool {
        if !self.sessions.capture_draft(op.session_key(), draft.clone()).await {
            return false;
        }
        log::info!("Captured {} broadcast draft in chat {}", draft.kind(), op.chat.0);

        // Echo what recipients will get
        if let Err(e) = self.transport.send_draft(op.chat, &draft).await {
            log::debug!("Preview echo skipped for chat {}: {}", op.chat.0, e);
        }

        let buttons = [
            ChoiceButton {
                label: self.text(op, "broadcast_send_button"),
                token: CONFIRM_TOKEN,
            },
            ChoiceButton {
                label: self.text(op, "broadcast_cancel_button"),
                token: CANCEL_TOKEN,
            },
        ];
        let preview = self.text(op, "broadcast_preview");
        if let Err(e) = self.transport.send_choice(op.chat, &preview, &buttons).await {
            log::warn!("Failed to send broadcast preview to {}: {}", op.chat.0, e);
        }
        true
    }

    pub async fn handle_choice(&self, op: &Operator, action: BroadcastAction) -> ChoiceOutcome {
        match action {
            BroadcastAction::Confirm => {
                let Some(draft) = self.sessions.take_draft(op.session_key()).await else {
                    self.notify(op, "broadcast_no_message").await;
                    return ChoiceOutcome::NothingPending;
                };

                log::info!("Broadcast confirmed by user {}", op.user.0);
                let report = self.dispatcher.dispatch(&draft).await;
                self.notify(op, "broadcast_sent").await;
                ChoiceOutcome::Sent(report)
            }
            BroadcastAction::Cancel => {
                self.sessions.discard_draft(op.session_key()).await;
                self.notify(op, "broadcast_canceled").await;
                ChoiceOutcome::Canceled
            }
        }
    }

    /// `/cancel`: like the cancel button, but silent when nothing was pending.
    pub async fn abort(&self, op: &Operator) -> bool {
        let had_session = self.sessions.discard_draft(op.session_key()).await;
        if had_session {
            self.notify(op, "broadcast_canceled").await;
        }
        had_session
    }

    fn text(&self, op: &Operator, key: &str) -> String {
        self.texts.get_text(&op.language, key)
    }

    async fn notify(&self, op: &Operator, key: &str) {
        if let Err(e) = self.transport.send_text(op.chat, &self.text(op, key)).await {
            log::warn!("Failed to send '{}' to chat {}: {}", key, op.chat.0, e);
        }
    }
}

use std::collections::HashMap;

use teloxide::types::{ChatId, UserId};
use tokio::sync::Mutex;

use super::draft::DraftMessage;

/// Where an operator is in the broadcast dialogue. `Idle` sessions are not stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BroadcastState {
    #[default]
    Idle,
    WaitingForMessage,
    WaitingForConfirmation { draft: DraftMessage },
}

/// A session belongs to one user in one chat; other members of a group chat
/// never see or drive it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct SessionKey {
    pub chat: ChatId,
    pub user: UserId,
}

/// Broadcast state per operator. Every operation takes the table lock once, so
/// transitions for one key are linearizable and keys never see each other's state.
#[derive(Debug, Default)]
pub struct SessionTracker {
    sessions: Mutex<HashMap<SessionKey, BroadcastState>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-invoking while already waiting just resets the session.
    pub async fn begin_draft_wait(&self, key: SessionKey) {
        self.sessions.lock().await.insert(key, BroadcastState::WaitingForMessage);
    }

    /// Returns false when this operator is not expecting a draft; the state is left untouched.
    pub async fn capture_draft(&self, key: SessionKey, draft: DraftMessage) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(&key) {
            Some(state) if *state == BroadcastState::WaitingForMessage => {
                *state = BroadcastState::WaitingForConfirmation { draft };
                true
            }
            _ => false,
        }
    }

    /// Consumes the pending draft. Only one caller per captured draft gets `Some`.
    pub async fn take_draft(&self, key: SessionKey) -> Option<DraftMessage> {
        let mut sessions = self.sessions.lock().await;
        if !matches!(sessions.get(&key), Some(BroadcastState::WaitingForConfirmation { .. })) {
            return None;
        }
        match sessions.remove(&key) {
            Some(BroadcastState::WaitingForConfirmation { draft }) => Some(draft),
            _ => None,
        }
    }

    /// Drops whatever the operator had pending. Returns whether anything was there.
    pub async fn discard_draft(&self, key: SessionKey) -> bool {
        self.sessions.lock().await.remove(&key).is_some()
    }

    pub async fn state(&self, key: SessionKey) -> BroadcastState {
        self.sessions.lock().await.get(&key).cloned().unwrap_or_default()
    }
}

use async_trait::async_trait;
use teloxide::types::ChatId;

/// Someone a broadcast is delivered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recipient {
    pub target: ChatId,
}

#[derive(Debug, thiserror::Error)]
#[error("recipient lookup failed: {0}")]
pub struct DirectoryError(pub String);

#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    /// Snapshot of every registered recipient, fetched once per broadcast.
    async fn fetch_all_recipients(&self) -> Result<Vec<Recipient>, DirectoryError>;
}

use async_trait::async_trait;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile};

use super::draft::DraftMessage;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Telegram(#[from] teloxide::RequestError),
    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),
    #[error("no delivery method for this payload")]
    UnsupportedPayload,
}

/// An inline button whose press comes back to the bot as `token`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceButton {
    pub label: String,
    pub token: &'static str,
}

/// Delivers one message to one chat.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send_text(&self, target: ChatId, text: &str) -> Result<(), TransportError>;

    async fn send_photo(
        &self,
        target: ChatId,
        file: &FileId,
        caption: Option<&str>,
    ) -> Result<(), TransportError>;

    async fn send_document(
        &self,
        target: ChatId,
        file: &FileId,
        caption: Option<&str>,
    ) -> Result<(), TransportError>;

    /// Sends `text` with a single row of inline buttons.
    async fn send_choice(
        &self,
        target: ChatId,
        text: &str,
        buttons: &[ChoiceButton],
    ) -> Result<(), TransportError>;

    async fn send_draft(&self, target: ChatId, draft: &DraftMessage) -> Result<(), TransportError> {
        match draft {
            DraftMessage::Text(text) => self.send_text(target, text).await,
            DraftMessage::Photo { file, caption } => {
                self.send_photo(target, file, caption.as_deref()).await
            }
            DraftMessage::Document { file, caption } => {
                self.send_document(target, file, caption.as_deref()).await
            }
            DraftMessage::Unsupported => Err(TransportError::UnsupportedPayload),
        }
    }
}

/// Bot API transport. Media is re-sent by file id, so nothing is downloaded.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send_text(&self, target: ChatId, text: &str) -> Result<(), TransportError> {
        self.bot.send_message(target, text).await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        target: ChatId,
        file: &FileId,
        caption: Option<&str>,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.send_photo(target, InputFile::file_id(file.clone()));
        if let Some(caption) = caption {
            request = request.caption(caption);
        }
        request.await?;
        Ok(())
    }

    async fn send_document(
        &self,
        target: ChatId,
        file: &FileId,
        caption: Option<&str>,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.send_document(target, InputFile::file_id(file.clone()));
        if let Some(caption) = caption {
            request = request.caption(caption);
        }
        request.await?;
        Ok(())
    }

    async fn send_choice(
        &self,
        target: ChatId,
        text: &str,
        buttons: &[ChoiceButton],
    ) -> Result<(), TransportError> {
        let row = buttons
            .iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.token))
            .collect::<Vec<_>>();

        self.bot
            .send_message(target, text)
            .reply_markup(InlineKeyboardMarkup::new(vec![row]))
            .await?;
        Ok(())
    }
}

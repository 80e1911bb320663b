use teloxide::types::{FileId, Message};

/// Broadcast payload captured from the operator, classified once at capture time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftMessage {
    Text(String),
    Photo { file: FileId, caption: Option<String> },
    Document { file: FileId, caption: Option<String> },
    Unsupported,
}

impl DraftMessage {
    pub fn from_message(msg: &Message) -> Self {
        // Telegram lists photo sizes smallest first
        let photo = msg.photo().and_then(|sizes| sizes.last()).map(|p| p.file.id.clone());
        let document = msg.document().map(|d| d.file.id.clone());
        Self::classify(msg.text(), photo, document, msg.caption())
    }

    /// Text wins over photo, photo over document; anything else cannot be re-sent.
    pub fn classify(
        text: Option<&str>,
        photo: Option<FileId>,
        document: Option<FileId>,
        caption: Option<&str>,
    ) -> Self {
        let caption = caption.filter(|c| !c.is_empty()).map(str::to_string);

        match (text.filter(|t| !t.is_empty()), photo, document) {
            (Some(text), _, _) => Self::Text(text.to_string()),
            (None, Some(file), _) => Self::Photo { file, caption },
            (None, None, Some(file)) => Self::Document { file, caption },
            (None, None, None) => Self::Unsupported,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Photo { .. } => "photo",
            Self::Document { .. } => "document",
            Self::Unsupported => "unsupported",
        }
    }
}

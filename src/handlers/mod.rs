pub mod broadcast;
pub mod callback;
pub mod command;

use teloxide::types::{CallbackQuery, ChatId, Message};

use crate::broadcast::Operator;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub use broadcast::receive_broadcast_message;
pub use callback::callback_handler;
pub use command::command_handler;

/// Messages without a sender (channel posts) have no operator.
pub fn operator_from_message(msg: &Message) -> Option<Operator> {
    let user = msg.from.as_ref()?;
    Some(Operator {
        user: user.id,
        chat: msg.chat.id,
        language: user.language_code.clone().unwrap_or_default(),
    })
}

/// Answers go to the chat holding the buttons, or to the presser's private chat
/// when that message is gone.
pub fn operator_from_callback(q: &CallbackQuery) -> Operator {
    Operator {
        user: q.from.id,
        chat: q
            .message
            .as_ref()
            .map(|m| m.chat().id)
            .unwrap_or_else(|| ChatId::from(q.from.id)),
        language: q.from.language_code.clone().unwrap_or_default(),
    }
}

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;

use crate::broadcast::{BroadcastAction, BroadcastService, ChoiceOutcome};
use crate::handlers::{HandlerResult, operator_from_callback};

pub async fn callback_handler(bot: Bot, q: CallbackQuery, service: Arc<BroadcastService>) -> HandlerResult {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    log::info!("Received callback query with data: {}", data);

    let Some(action) = BroadcastAction::from_token(data) else {
        return Ok(());
    };

    // Answer before dispatching, a broadcast can outlive the callback deadline.
    // Stale queries cannot be answered but the choice still counts.
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        log::warn!("Failed to answer callback query {:?}: {}", q.id, e);
    }

    // Delete buttons
    if let Some(msg) = &q.message {
        let _ = bot.edit_message_reply_markup(msg.chat().id, msg.id()).await;
    }

    let op = operator_from_callback(&q);
    if let ChoiceOutcome::Sent(report) = service.handle_choice(&op, action).await {
        log::info!("Broadcast by user {} done: {}", op.user.0, report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::testing::{FakeDirectory, FakeTransport, Sent};
    use crate::broadcast::FanoutDispatcher;
    use crate::translation::TranslationManager;
    use std::time::Duration;
    use teloxide::types::UserId;

    fn cancel_query(user_id: u64) -> CallbackQuery {
        serde_json::from_value(serde_json::json!({
            "id": "4382bfdwdsb323b2d9",
            "from": { "id": user_id, "is_bot": false, "first_name": "Admin", "language_code": "en" },
            "chat_instance": "-1201489183",
            "data": "broadcast_cancel"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_choice_runs_when_answer_fails() {
        let transport = Arc::new(FakeTransport::new());
        let texts = Arc::new(TranslationManager::with_defaults("en").unwrap());
        let dispatcher = FanoutDispatcher::new(
            Arc::new(FakeDirectory::with(&[])),
            transport.clone(),
            1,
            Duration::from_millis(200),
        );
        let service = Arc::new(BroadcastService::new(UserId(42), dispatcher, transport.clone(), texts.clone()));

        // Nothing listens there, so every Bot API call errors out
        let bot = Bot::new("123:TEST").set_api_url("http://127.0.0.1:9/".parse().unwrap());

        callback_handler(bot, cancel_query(42), service).await.unwrap();

        assert_eq!(
            transport.sent(),
            vec![Sent::Text(ChatId(42), texts.get_text("en", "broadcast_canceled"))]
        );
    }
}

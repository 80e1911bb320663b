use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::broadcast::BroadcastService;
use crate::commands::Command;
use crate::database::DatabasePool;
use crate::handlers::{HandlerResult, operator_from_message};
use crate::translation::TranslationManager;
use std::sync::Arc;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    db_pool: Arc<DatabasePool>,
    texts: Arc<TranslationManager>,
    service: Arc<BroadcastService>,
) -> HandlerResult {
    let Some(op) = operator_from_message(&msg) else {
        return Ok(());
    };

    match cmd {
        Command::Start => {
            if let Err(e) = db_pool.register_customer(msg.chat.id.0, &op.language).await {
                log::error!("Failed to register customer {}: {}", msg.chat.id.0, e);
            }
            bot.send_message(msg.chat.id, texts.get_text(&op.language, "start_welcome"))
                .await?;
        }
        Command::Help => {
            let help = format!(
                "{}\n\n{}",
                texts.get_text(&op.language, "help_text"),
                Command::descriptions()
            );
            bot.send_message(msg.chat.id, help).await?;
        }
        Command::Broadcast => {
            service.handle_invoke(&op).await;
        }
        Command::Cancel => {
            service.abort(&op).await;
        }
    };
    Ok(())
}

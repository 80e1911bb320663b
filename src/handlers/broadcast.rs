use std::sync::Arc;
use teloxide::prelude::*;

use crate::broadcast::{BroadcastService, DraftMessage};
use crate::handlers::{HandlerResult, operator_from_message};

/// Every non-command message lands here; only chats waiting for a draft react.
pub async fn receive_broadcast_message(msg: Message, service: Arc<BroadcastService>) -> HandlerResult {
    let Some(op) = operator_from_message(&msg) else {
        return Ok(());
    };

    service.handle_candidate(&op, DraftMessage::from_message(&msg)).await;
    Ok(())
}

use std::sync::Arc;

use teloxide::prelude::*;

use cro_core::domain::{ChatId, InboundMessage, UserId};

use crate::router::AppState;

pub async fn handle_text(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };
    if text.trim().is_empty() {
        return Ok(());
    }

    let inbound = InboundMessage {
        chat_id: ChatId(msg.chat.id.0),
        user_id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        text: text.to_string(),
    };

    let reply = state.handler.handle(&inbound).await;

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

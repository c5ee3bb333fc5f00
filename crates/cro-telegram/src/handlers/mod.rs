use std::sync::Arc;

use teloxide::prelude::*;

use crate::router::AppState;

mod commands;
mod text;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let user_id = msg.from().map(|u| u.id.0 as i64);

    if !is_authorized(user_id, &state.cfg.telegram_allowed_users) {
        let _ = bot
            .send_message(
                msg.chat.id,
                "Unauthorized. Contact the bot owner for access.",
            )
            .await;
        return Ok(());
    }

    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            return commands::handle_command(bot, msg, state).await;
        }
        return text::handle_text(bot, msg, state).await;
    }

    // Voice, photos etc: this bot only understands text questions.
    let _ = bot
        .send_message(msg.chat.id, "I can only answer text questions about crypto prices.")
        .await;

    Ok(())
}

/// An empty allow-list means the bot is public.
fn is_authorized(user_id: Option<i64>, allowed: &[i64]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    user_id.is_some_and(|id| allowed.contains(&id))
}

#[cfg(test)]
mod tests {
    use super::is_authorized;

    #[test]
    fn empty_allow_list_is_public() {
        assert!(is_authorized(Some(1), &[]));
        assert!(is_authorized(None, &[]));
    }

    #[test]
    fn allow_list_gates_users() {
        assert!(is_authorized(Some(42), &[42, 7]));
        assert!(!is_authorized(Some(43), &[42, 7]));
        assert!(!is_authorized(None, &[42]));
    }
}

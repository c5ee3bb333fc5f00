use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::info;

use cro_core::{config::Config, handler::ConversationHandler};

use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub handler: Arc<ConversationHandler>,
}

pub async fn run_polling(cfg: Arc<Config>, handler: Arc<ConversationHandler>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    if let Ok(me) = bot.get_me().await {
        info!("crypto oracle bot started: @{}", me.username());
    }
    if cfg.telegram_allowed_users.is_empty() {
        info!("open access: no TELEGRAM_ALLOWED_USERS configured");
    } else {
        info!("allowed users: {}", cfg.telegram_allowed_users.len());
    }

    let state = Arc::new(AppState { cfg, handler });

    let tree = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, tree)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}

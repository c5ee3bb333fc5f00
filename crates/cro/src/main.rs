use std::sync::Arc;

use cro_core::{
    classifier::IntentClassifier,
    composer::ResponseComposer,
    config::Config,
    handler::ConversationHandler,
    ports::{LanguageModelPort, MarketDataPort},
};
use cro_markets::MarketDataClient;
use cro_openai::OpenAiClient;

#[tokio::main]
async fn main() -> Result<(), cro_core::Error> {
    cro_core::logging::init("cro")?;

    let cfg = Arc::new(Config::load()?);

    let llm: Arc<dyn LanguageModelPort> = Arc::new(OpenAiClient::from_config(&cfg)?);
    let markets: Arc<dyn MarketDataPort> = Arc::new(MarketDataClient::from_config(&cfg)?);

    let handler = Arc::new(ConversationHandler::new(
        IntentClassifier::new(llm.clone()),
        markets,
        ResponseComposer::new(llm),
    ));

    cro_telegram::router::run_polling(cfg, handler)
        .await
        .map_err(|e| cro_core::Error::upstream("telegram", format!("bot failed: {e}")))?;

    Ok(())
}

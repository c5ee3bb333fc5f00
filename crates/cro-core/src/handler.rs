//! Per-message orchestration.
//!
//! One pass per inbound message: classify, fetch, compose. Every failure
//! past classification degrades to an apologetic reply; the handler never
//! returns an error to the transport and never leaks raw upstream errors
//! to the user. It holds no mutable state, so concurrent messages from the
//! hosting transport are safe.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    classifier::IntentClassifier,
    composer::{fallback_reply, DataOutcome, ResolvedQuote, ResponseComposer, STATIC_APOLOGY},
    domain::{InboundMessage, Intent},
    errors::Error,
    ports::MarketDataPort,
};

pub struct ConversationHandler {
    classifier: IntentClassifier,
    markets: Arc<dyn MarketDataPort>,
    composer: ResponseComposer,
}

impl ConversationHandler {
    pub fn new(
        classifier: IntentClassifier,
        markets: Arc<dyn MarketDataPort>,
        composer: ResponseComposer,
    ) -> Self {
        Self {
            classifier,
            markets,
            composer,
        }
    }

    /// Answer one message. Always returns reply text.
    pub async fn handle(&self, msg: &InboundMessage) -> String {
        let user = msg.user_id.0;
        info!(user, text = %msg.text, "incoming message");

        // Received -> Classified. A classifier failure is terminal: reply
        // with the static apology without touching market data or the
        // composer.
        let intent = match self.classifier.classify(&msg.text).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!(user, error = %e, "intent classification failed");
                return STATIC_APOLOGY.to_string();
            }
        };
        info!(user, ?intent, "classified");

        // Classified -> DataResolved. Fetch failures are recorded for the
        // composer instead of aborting.
        let outcome = self.resolve_data(&intent).await;

        // DataResolved -> Done.
        match self.composer.compose(&msg.text, &intent, &outcome).await {
            Ok(text) => text,
            Err(e) => {
                warn!(user, error = %e, "response composition failed, using local fallback");
                fallback_reply(&intent, &outcome)
            }
        }
    }

    async fn resolve_data(&self, intent: &Intent) -> DataOutcome {
        match intent {
            Intent::Price { asset, currency } => {
                match self.markets.spot_price(*asset, currency).await {
                    Ok(quote) => DataOutcome::Resolved(ResolvedQuote {
                        amount: 1.0,
                        result: quote.rate,
                        quote,
                    }),
                    Err(e) => fetch_failure(&e, &format!("the {asset}-{currency} price")),
                }
            }
            Intent::Convert { amount, from, to } => {
                match self.markets.conversion_rate(*from, to).await {
                    Ok(quote) => DataOutcome::Resolved(ResolvedQuote {
                        amount: *amount,
                        result: amount * quote.rate,
                        quote,
                    }),
                    Err(e) => fetch_failure(&e, &format!("the {from} to {to} rate")),
                }
            }
            Intent::Unknown { reason } => DataOutcome::Missing {
                description: reason.clone().unwrap_or_else(|| {
                    "which cryptocurrency or action the user meant".to_string()
                }),
            },
        }
    }
}

fn fetch_failure(e: &Error, what: &str) -> DataOutcome {
    warn!(error = %e, "market data fetch failed");
    let description = match e {
        Error::UnknownAsset(sym) => format!("{sym} is not a supported asset or currency"),
        _ => format!("{what} could not be fetched right now"),
    };
    DataOutcome::Missing { description }
}

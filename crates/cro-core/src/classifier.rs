//! Intent classification.
//!
//! One model call per inbound message, constrained to a small JSON
//! vocabulary, parsed into a typed [`Intent`]. The model is asked for JSON
//! only, but replies occasionally arrive wrapped in code fences, so the
//! parser extracts the first JSON object it can find before deserializing.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Deserialize;

use crate::{
    domain::{Asset, Intent},
    errors::Error,
    ports::{CompletionRequest, LanguageModelPort},
    Result,
};

const INTENT_PROMPT: &str = r#"You are an intent classifier for a crypto assistant. Analyze the user's message and output JSON with:
- intent: "price", "convert", or "error"
- parameters: Extract relevant entities

Output ONLY JSON with these possible structures:
{"intent": "price", "crypto_symbol": "BTC", "fiat_currency": "USD"}
{"intent": "convert", "amount": 0.5, "from_asset": "ETH", "to_asset": "USD"}
{"intent": "error", "reason": "message"}

Rules:
1. Default fiat: USD
2. Default amount: 1
3. For price checks: Extract crypto symbol
4. For conversions: Extract amount, from_asset, to_asset
5. If unsure, return error intent

Examples:
User: "What's bitcoin worth?" -> {"intent": "price", "crypto_symbol": "BTC"}
User: "Convert 1 ethereum to dollars" -> {"intent": "convert", "amount": 1, "from_asset": "ETH", "to_asset": "USD"}"#;

/// Raw shape the model is asked to emit.
#[derive(Debug, Deserialize)]
struct IntentWire {
    intent: String,
    #[serde(default)]
    crypto_symbol: Option<String>,
    #[serde(default)]
    fiat_currency: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    from_asset: Option<String>,
    #[serde(default)]
    to_asset: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Clone)]
pub struct IntentClassifier {
    llm: Arc<dyn LanguageModelPort>,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn LanguageModelPort>) -> Self {
        Self { llm }
    }

    /// Classify one free-text query into an [`Intent`].
    ///
    /// Errors with `Upstream` when the model service call fails and
    /// `Classification` when its output cannot be parsed. A model-reported
    /// error intent, or an asset outside the supported set, is not an
    /// error: it maps to [`Intent::Unknown`].
    pub async fn classify(&self, query: &str) -> Result<Intent> {
        let raw = self
            .llm
            .complete(CompletionRequest {
                system: INTENT_PROMPT.to_string(),
                user: query.to_string(),
                json_mode: true,
                temperature: 0.1,
            })
            .await?;

        parse_intent(&raw)
    }
}

fn json_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Greedy: first `{` through last `}` across lines, so fenced or
    // prefixed output still yields the object.
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex"))
}

fn parse_intent(raw: &str) -> Result<Intent> {
    let json = json_object_re()
        .find(raw)
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Classification(format!("no JSON object in model output: {raw:?}")))?;

    let wire: IntentWire = serde_json::from_str(json)
        .map_err(|e| Error::Classification(format!("bad intent payload: {e}")))?;

    Ok(match wire.intent.as_str() {
        "price" => {
            let Some(symbol) = wire.crypto_symbol else {
                return Err(Error::Classification(
                    "price intent without crypto_symbol".to_string(),
                ));
            };
            match symbol.parse::<Asset>() {
                Ok(asset) => Intent::Price {
                    asset,
                    currency: wire
                        .fiat_currency
                        .map(|c| c.trim().to_uppercase())
                        .filter(|c| !c.is_empty())
                        .unwrap_or_else(|| "USD".to_string()),
                },
                Err(()) => Intent::Unknown {
                    reason: Some(format!("unsupported asset {symbol}")),
                },
            }
        }
        "convert" => {
            let Some(from) = wire.from_asset else {
                return Err(Error::Classification(
                    "convert intent without from_asset".to_string(),
                ));
            };
            match from.parse::<Asset>() {
                Ok(from) => Intent::Convert {
                    amount: wire
                        .amount
                        .filter(|a| a.is_finite() && *a > 0.0)
                        .unwrap_or(1.0),
                    from,
                    to: wire
                        .to_asset
                        .map(|t| t.trim().to_uppercase())
                        .filter(|t| !t.is_empty())
                        .unwrap_or_else(|| "USD".to_string()),
                },
                Err(()) => Intent::Unknown {
                    reason: Some(format!("unsupported asset {from}")),
                },
            }
        }
        "error" => Intent::Unknown { reason: wire.reason },
        other => Intent::Unknown {
            reason: Some(format!("unrecognized intent {other}")),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic model stub: always replies with a canned string.
    struct CannedLlm(String);

    #[async_trait]
    impl LanguageModelPort for CannedLlm {
        async fn complete(&self, _req: CompletionRequest) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct DownLlm;

    #[async_trait]
    impl LanguageModelPort for DownLlm {
        async fn complete(&self, _req: CompletionRequest) -> Result<String> {
            Err(Error::upstream("openai", "connection refused"))
        }
    }

    fn classifier(reply: &str) -> IntentClassifier {
        IntentClassifier::new(Arc::new(CannedLlm(reply.to_string())))
    }

    #[tokio::test]
    async fn price_query_maps_to_typed_intent() {
        let c = classifier(r#"{"intent": "price", "crypto_symbol": "BTC"}"#);
        let intent = c.classify("What's Bitcoin worth?").await.unwrap();
        assert_eq!(
            intent,
            Intent::Price {
                asset: Asset::Btc,
                currency: "USD".to_string()
            }
        );
    }

    #[tokio::test]
    async fn convert_query_keeps_amount_and_pair() {
        let c = classifier(
            r#"{"intent": "convert", "amount": 2, "from_asset": "ETH", "to_asset": "BTC"}"#,
        );
        let intent = c.classify("convert 2 ETH to BTC").await.unwrap();
        assert_eq!(
            intent,
            Intent::Convert {
                amount: 2.0,
                from: Asset::Eth,
                to: "BTC".to_string()
            }
        );
    }

    #[tokio::test]
    async fn fenced_output_still_parses() {
        let c = classifier(
            "```json\n{\"intent\": \"price\", \"crypto_symbol\": \"sol\", \"fiat_currency\": \"eur\"}\n```",
        );
        let intent = c.classify("sol in euros?").await.unwrap();
        assert_eq!(
            intent,
            Intent::Price {
                asset: Asset::Sol,
                currency: "EUR".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unsupported_symbol_degrades_to_unknown() {
        let c = classifier(r#"{"intent": "price", "crypto_symbol": "SHIB"}"#);
        match c.classify("shiba price").await.unwrap() {
            Intent::Unknown { reason } => {
                assert!(reason.unwrap_or_default().contains("SHIB"));
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn model_error_intent_is_unknown() {
        let c = classifier(r#"{"intent": "error", "reason": "Unclear query"}"#);
        assert_eq!(
            c.classify("hello").await.unwrap(),
            Intent::Unknown {
                reason: Some("Unclear query".to_string())
            }
        );
    }

    #[tokio::test]
    async fn prose_output_is_classification_error() {
        let c = classifier("I think the user wants a price.");
        match c.classify("btc?").await {
            Err(Error::Classification(_)) => {}
            other => panic!("expected Classification error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_symbol_is_classification_error() {
        let c = classifier(r#"{"intent": "price"}"#);
        assert!(matches!(
            c.classify("price?").await,
            Err(Error::Classification(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_model_surfaces_upstream() {
        let c = IntentClassifier::new(Arc::new(DownLlm));
        assert!(matches!(
            c.classify("btc?").await,
            Err(Error::Upstream { .. })
        ));
    }

    #[tokio::test]
    async fn defaulted_amount_is_one() {
        let c = classifier(r#"{"intent": "convert", "from_asset": "BTC", "to_asset": "eth"}"#);
        assert_eq!(
            c.classify("btc in eth").await.unwrap(),
            Intent::Convert {
                amount: 1.0,
                from: Asset::Btc,
                to: "ETH".to_string()
            }
        );
    }
}

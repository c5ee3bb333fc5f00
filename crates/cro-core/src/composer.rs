//! Response composition.
//!
//! Turns a classified intent plus fetched numbers into a short friendly
//! reply via the language model. When the model itself is down, the caller
//! falls back to [`fallback_reply`], which formats the fetched data plainly
//! and never invents numbers it does not have.

use std::sync::Arc;

use serde_json::json;

use crate::{
    domain::{Intent, Quote},
    ports::{CompletionRequest, LanguageModelPort},
    Result,
};

const RESPONSE_PROMPT: &str = r#"You're a friendly crypto expert. Answer the user's question naturally and conversationally. Follow these guidelines:

1. Be concise (1-2 sentences maximum)
2. Use everyday language, not financial jargon
3. Format numbers clearly (e.g., $12,000.50)
4. Never state a price or rate that is not present in the data below
5. If the data says something could not be determined, apologize briefly and say what was missing, without making up any numbers
6. NEVER use markdown, bullet points, or numbered lists

Data: "#;

/// Sent when the classifier itself cannot be reached or understood.
pub const STATIC_APOLOGY: &str =
    "Sorry, I couldn't work that one out. Try something like 'ETH price' or 'convert BTC to USD'.";

/// Market-data stage result carried into composition, with any conversion
/// amount already applied.
#[derive(Clone, Debug)]
pub struct ResolvedQuote {
    pub quote: Quote,
    /// Units converted; 1.0 for plain price queries.
    pub amount: f64,
    /// `amount * quote.rate`.
    pub result: f64,
}

/// What the market-data stage produced for the composer.
#[derive(Clone, Debug)]
pub enum DataOutcome {
    Resolved(ResolvedQuote),
    /// No numbers available: unknown intent or a failed fetch. The
    /// description is phrased for the model, not shown verbatim to users.
    Missing { description: String },
}

#[derive(Clone)]
pub struct ResponseComposer {
    llm: Arc<dyn LanguageModelPort>,
}

impl ResponseComposer {
    pub fn new(llm: Arc<dyn LanguageModelPort>) -> Self {
        Self { llm }
    }

    /// Phrase the outcome as a short natural-language answer.
    ///
    /// Errors with `Upstream` only when the model service is unreachable;
    /// the handler then substitutes [`fallback_reply`].
    pub async fn compose(&self, query: &str, intent: &Intent, outcome: &DataOutcome) -> Result<String> {
        let data = outcome_data(intent, outcome);
        let system = format!("{RESPONSE_PROMPT}{data}");

        self.llm
            .complete(CompletionRequest {
                system,
                user: query.to_string(),
                json_mode: false,
                temperature: 0.8,
            })
            .await
    }
}

fn outcome_data(intent: &Intent, outcome: &DataOutcome) -> serde_json::Value {
    match outcome {
        DataOutcome::Resolved(r) => match intent {
            Intent::Price { asset, currency } => json!({
                "price": r.quote.rate,
                "asset": asset.as_str(),
                "currency": currency,
            }),
            Intent::Convert { from, to, .. } => json!({
                "amount": r.amount,
                "from": from.as_str(),
                "to": to,
                "result": r.result,
                "rate": r.quote.rate,
            }),
            // A resolved quote implies a price or convert intent; keep the
            // raw numbers if that assumption ever breaks.
            Intent::Unknown { .. } => json!({
                "rate": r.quote.rate,
                "pair": format!("{}-{}", r.quote.base, r.quote.quote),
            }),
        },
        DataOutcome::Missing { description } => json!({
            "could_not_determine": description,
        }),
    }
}

/// Deterministic local reply used when response composition fails but the
/// orchestration already knows the answer (or knows there is none).
pub fn fallback_reply(intent: &Intent, outcome: &DataOutcome) -> String {
    match outcome {
        DataOutcome::Resolved(r) => match intent {
            Intent::Price { asset, currency } => {
                format!("{asset} is currently at {}", format_money(r.quote.rate, currency))
            }
            Intent::Convert { from, to, .. } => format!(
                "{} {from} is about {} {to} right now",
                trim_amount(r.amount),
                format_amount(r.result)
            ),
            Intent::Unknown { .. } => STATIC_APOLOGY.to_string(),
        },
        DataOutcome::Missing { .. } => STATIC_APOLOGY.to_string(),
    }
}

/// `61200.5` -> `61,200.50`.
pub fn format_amount(v: f64) -> String {
    let s = format!("{:.2}", v.abs());
    let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

fn format_money(v: f64, currency: &str) -> String {
    if currency.eq_ignore_ascii_case("usd") {
        format!("${}", format_amount(v))
    } else {
        format!("{} {currency}", format_amount(v))
    }
}

/// Render a user-supplied amount without trailing noise: `2` not `2.00`.
fn trim_amount(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Asset, Provider};

    fn resolved(rate: f64, amount: f64) -> DataOutcome {
        DataOutcome::Resolved(ResolvedQuote {
            quote: Quote::new("BTC", "USD", rate, Provider::Coinbase),
            amount,
            result: amount * rate,
        })
    }

    #[test]
    fn amounts_get_thousands_separators() {
        assert_eq!(format_amount(61200.5), "61,200.50");
        assert_eq!(format_amount(999.0), "999.00");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(0.41), "0.41");
    }

    #[test]
    fn price_fallback_formats_usd() {
        let intent = Intent::Price {
            asset: Asset::Btc,
            currency: "USD".to_string(),
        };
        assert_eq!(
            fallback_reply(&intent, &resolved(61200.5, 1.0)),
            "BTC is currently at $61,200.50"
        );
    }

    #[test]
    fn convert_fallback_carries_amount() {
        let intent = Intent::Convert {
            amount: 2.0,
            from: Asset::Eth,
            to: "BTC".to_string(),
        };
        let out = fallback_reply(&intent, &resolved(0.05, 2.0));
        assert_eq!(out, "2 ETH is about 0.10 BTC right now");
    }

    #[test]
    fn missing_data_fallback_has_no_digits() {
        let intent = Intent::Unknown { reason: None };
        let out = fallback_reply(
            &intent,
            &DataOutcome::Missing {
                description: "provider unreachable".to_string(),
            },
        );
        assert!(!out.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn missing_data_prompt_carries_no_fabricated_numbers() {
        let data = outcome_data(
            &Intent::Price {
                asset: Asset::Sol,
                currency: "USD".to_string(),
            },
            &DataOutcome::Missing {
                description: "live price data for SOL is unavailable".to_string(),
            },
        );
        let text = data.to_string();
        assert!(text.contains("could_not_determine"));
        assert!(!text.contains("price\":"));
    }
}

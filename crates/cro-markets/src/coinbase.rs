//! Coinbase spot-price adapter (primary provider).
//!
//! `GET {base}/{ASSET}-{CURRENCY}/spot` returns `{"data": {"amount": "..."}}`
//! with the amount as a decimal string.

use std::time::Duration;

use cro_core::{
    domain::{Asset, Provider, Quote},
    errors::Error,
    Result,
};

#[derive(Clone, Debug)]
pub struct CoinbaseClient {
    base_url: String,
    http: reqwest::Client,
}

impl CoinbaseClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::upstream("coinbase", format!("http client build: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub async fn spot_price(&self, asset: Asset, currency: &str) -> Result<Quote> {
        let currency = currency.trim().to_uppercase();
        let pair = format!("{}-{currency}", asset.as_str());

        let resp = self
            .http
            .get(format!("{}/{pair}/spot", self.base_url))
            .send()
            .await
            .map_err(|e| Error::upstream("coinbase", format!("request error: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::UnknownAsset(pair));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::upstream(
                "coinbase",
                format!("{status} {}", body.chars().take(200).collect::<String>()),
            ));
        }

        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::upstream("coinbase", format!("json error: {e}")))?;

        let rate = parse_spot_amount(&v)
            .ok_or_else(|| Error::upstream("coinbase", format!("malformed spot payload: {v}")))?;

        Ok(Quote::new(asset.as_str(), currency, rate, Provider::Coinbase))
    }
}

/// Extract a strictly positive amount from a spot payload, or `None` if the
/// payload is malformed. Coinbase serializes amounts as strings.
pub(crate) fn parse_spot_amount(v: &serde_json::Value) -> Option<f64> {
    let amount = v.get("data")?.get("amount")?;
    let rate = match amount {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        serde_json::Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

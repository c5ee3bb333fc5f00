//! CoinGecko conversion-rate adapter (secondary provider).
//!
//! `GET {base}?ids=<slug>&vs_currencies=<ticker>` returns
//! `{"<slug>": {"<ticker>": <rate>}}`. Coins are keyed by slug on the `ids`
//! side but by lowercase ticker on the `vs_currencies` side.

use std::time::Duration;

use cro_core::{
    domain::{Asset, Provider, Quote},
    errors::Error,
    Result,
};

#[derive(Clone, Debug)]
pub struct CoinGeckoClient {
    base_url: String,
    http: reqwest::Client,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::upstream("coingecko", format!("http client build: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub async fn conversion_rate(&self, from: Asset, to: &str) -> Result<Quote> {
        let id = from.coingecko_id();
        let vs = to.trim().to_lowercase();

        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("ids", id), ("vs_currencies", vs.as_str())])
            .send()
            .await
            .map_err(|e| Error::upstream("coingecko", format!("request error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::upstream(
                "coingecko",
                format!("{status} {}", body.chars().take(200).collect::<String>()),
            ));
        }

        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::upstream("coingecko", format!("json error: {e}")))?;

        // A 200 with the vs-currency key missing means CoinGecko does not
        // quote this pair, not that the service failed.
        let rate = parse_simple_price(&v, id, &vs)
            .ok_or_else(|| Error::UnknownAsset(to.trim().to_uppercase()))?;

        Ok(Quote::new(
            from.as_str(),
            to.trim().to_uppercase(),
            rate,
            Provider::CoinGecko,
        ))
    }
}

pub(crate) fn parse_simple_price(v: &serde_json::Value, id: &str, vs: &str) -> Option<f64> {
    let rate = v.get(id)?.get(vs)?.as_f64()?;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

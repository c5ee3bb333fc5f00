//! Market-data adapters: Coinbase for spot prices, CoinGecko for
//! cross-asset conversion rates, combined behind `MarketDataPort`.

use std::time::Duration;

use async_trait::async_trait;

use cro_core::{
    config::Config,
    domain::{Asset, Quote},
    ports::MarketDataPort,
    Result,
};

mod coinbase;
mod coingecko;

pub use coinbase::CoinbaseClient;
pub use coingecko::CoinGeckoClient;

/// Conversion targets routed through the Coinbase USD spot price instead of
/// CoinGecko, since dollar-pegged targets are quoted as USD anyway.
const FIAT_LIKE_TARGETS: &[&str] = &["USD", "USDT", "USDC"];

/// Both providers behind one port. Single attempt per call, no retries;
/// the conversation handler decides how to degrade.
#[derive(Clone, Debug)]
pub struct MarketDataClient {
    coinbase: CoinbaseClient,
    coingecko: CoinGeckoClient,
}

impl MarketDataClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.coinbase_api_url.clone(),
            cfg.coingecko_api_url.clone(),
            cfg.upstream_timeout,
        )
    }

    pub fn new(
        coinbase_url: impl Into<String>,
        coingecko_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            coinbase: CoinbaseClient::new(coinbase_url, timeout)?,
            coingecko: CoinGeckoClient::new(coingecko_url, timeout)?,
        })
    }
}

#[async_trait]
impl MarketDataPort for MarketDataClient {
    async fn spot_price(&self, asset: Asset, currency: &str) -> Result<Quote> {
        self.coinbase.spot_price(asset, currency).await
    }

    async fn conversion_rate(&self, from: Asset, to: &str) -> Result<Quote> {
        if is_fiat_like(to) {
            let mut quote = self.coinbase.spot_price(from, "USD").await?;
            quote.quote = to.trim().to_uppercase();
            return Ok(quote);
        }
        self.coingecko.conversion_rate(from, to).await
    }
}

fn is_fiat_like(symbol: &str) -> bool {
    let s = symbol.trim().to_uppercase();
    FIAT_LIKE_TARGETS.contains(&s.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollar_pegged_targets_are_fiat_like() {
        assert!(is_fiat_like("usd"));
        assert!(is_fiat_like(" USDT "));
        assert!(is_fiat_like("usdc"));
        assert!(!is_fiat_like("BTC"));
        assert!(!is_fiat_like("EUR"));
    }
}

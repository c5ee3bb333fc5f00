use async_trait::async_trait;

use crate::{
    domain::{Asset, Quote},
    Result,
};

/// Hexagonal port for market data.
///
/// Coinbase (spot) and CoinGecko (cross-asset rates) are the first
/// implementations, combined behind one port in `cro-markets`. Single
/// attempt per call; callers decide whether to surface the failure or
/// degrade gracefully.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Current spot price of `asset` denominated in `currency`.
    ///
    /// Errors with `Upstream` when the provider is unreachable or returns a
    /// non-success/malformed payload, `UnknownAsset` when the pair is not
    /// supported.
    async fn spot_price(&self, asset: Asset, currency: &str) -> Result<Quote>;

    /// Instantaneous conversion rate from `from` to `to`, same failure modes.
    async fn conversion_rate(&self, from: Asset, to: &str) -> Result<Quote>;
}

/// One prompt sent to the language-model service.
#[derive(Clone, Debug)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    /// Constrain the model to emit a single JSON object (classification).
    pub json_mode: bool,
    pub temperature: f32,
}

/// Hexagonal port for the language model, used in two modes: structured
/// intent classification and free-text response composition.
#[async_trait]
pub trait LanguageModelPort: Send + Sync {
    /// Run one completion and return the raw text. Errors with `Upstream`
    /// only; parsing the content is the caller's concern.
    async fn complete(&self, req: CompletionRequest) -> Result<String>;
}

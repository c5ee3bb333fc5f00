use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Inbound chat message as the transport delivers it. Nothing is retained
/// between messages; each one is classified and answered independently.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub text: String,
}

/// The cryptocurrencies the bot answers questions about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Asset {
    Btc,
    Eth,
    Sol,
    Xrp,
    Ada,
    Doge,
}

impl Asset {
    pub const ALL: [Asset; 6] = [
        Asset::Btc,
        Asset::Eth,
        Asset::Sol,
        Asset::Xrp,
        Asset::Ada,
        Asset::Doge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Sol => "SOL",
            Asset::Xrp => "XRP",
            Asset::Ada => "ADA",
            Asset::Doge => "DOGE",
        }
    }

    /// CoinGecko's simple-price endpoint keys coins by slug, not ticker.
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Asset::Btc => "bitcoin",
            Asset::Eth => "ethereum",
            Asset::Sol => "solana",
            Asset::Xrp => "ripple",
            Asset::Ada => "cardano",
            Asset::Doge => "dogecoin",
        }
    }
}

impl FromStr for Asset {
    type Err = ();

    /// Accepts tickers and common full names, case-insensitive. Anything
    /// else is unsupported and the caller decides how to degrade.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BTC" | "BITCOIN" => Ok(Asset::Btc),
            "ETH" | "ETHEREUM" => Ok(Asset::Eth),
            "SOL" | "SOLANA" => Ok(Asset::Sol),
            "XRP" | "RIPPLE" => Ok(Asset::Xrp),
            "ADA" | "CARDANO" => Ok(Asset::Ada),
            "DOGE" | "DOGECOIN" => Ok(Asset::Doge),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which external provider produced a quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Coinbase,
    CoinGecko,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Coinbase => "coinbase",
            Provider::CoinGecko => "coingecko",
        }
    }
}

/// A single price or rate observation. Ephemeral: produced by the market
/// data adapter and consumed by the composer within one message.
#[derive(Clone, Debug)]
pub struct Quote {
    /// Asset being priced.
    pub base: String,
    /// What it is denominated in.
    pub quote: String,
    pub rate: f64,
    pub source: Provider,
    pub quoted_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(base: impl Into<String>, quote: impl Into<String>, rate: f64, source: Provider) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
            rate,
            source,
            quoted_at: Utc::now(),
        }
    }
}

/// Classified purpose of one user message. Built once per message from the
/// model's structured output, then discarded after the reply is composed.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    /// "What's Bitcoin worth?" — spot price of one asset in a currency.
    Price { asset: Asset, currency: String },
    /// "convert 2 ETH to BTC" — amount defaults to 1 when the user names none.
    Convert { amount: f64, from: Asset, to: String },
    /// The model could not map the message to a supported question, or the
    /// asset named is outside the supported set.
    Unknown { reason: Option<String> },
}

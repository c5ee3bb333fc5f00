use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// Typed configuration, read once at startup. Read-only afterwards; the
/// handler and adapters share it behind an `Arc`.
#[derive(Clone, Debug)]
pub struct Config {
    // Credentials
    pub telegram_bot_token: String,
    pub openai_api_key: String,

    /// Empty list means the bot answers anyone.
    pub telegram_allowed_users: Vec<i64>,

    // Model
    pub openai_model: String,
    pub openai_api_url: String,

    // Market data
    pub coinbase_api_url: String,
    pub coingecko_api_url: String,

    /// Bounded wait applied to every outbound call; a timed-out upstream
    /// degrades to the fallback reply instead of hanging the chat.
    pub upstream_timeout: Duration,
}

const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo";
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_COINBASE_API_URL: &str = "https://api.coinbase.com/v2/prices";
const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required env vars
        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let openai_api_key = env_str("OPENAI_API_KEY").unwrap_or_default();
        if openai_api_key.trim().is_empty() {
            return Err(Error::Config(
                "OPENAI_API_KEY environment variable is required".to_string(),
            ));
        }

        let telegram_allowed_users = parse_csv_i64(env_str("TELEGRAM_ALLOWED_USERS"));

        let openai_model = env_str("OPENAI_MODEL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        let openai_api_url = env_str("OPENAI_API_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string());

        let coinbase_api_url = env_str("COINBASE_API_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_COINBASE_API_URL.to_string());
        let coingecko_api_url = env_str("COINGECKO_API_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_COINGECKO_API_URL.to_string());

        let upstream_timeout =
            Duration::from_millis(env_u64("UPSTREAM_TIMEOUT_MS").unwrap_or(10_000));

        Ok(Self {
            telegram_bot_token,
            openai_api_key,
            telegram_allowed_users,
            openai_model,
            openai_api_url,
            coinbase_api_url,
            coingecko_api_url,
            upstream_timeout,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

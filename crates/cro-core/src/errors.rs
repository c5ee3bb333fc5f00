/// Core error type for the bot.
///
/// Adapter crates map their specific failures into this type so the
/// conversation handler can degrade consistently (apologetic reply vs
/// static fallback) without ever leaking raw upstream errors to the user.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// An external dependency (market-data provider or language model) was
    /// unreachable or returned a non-success response.
    #[error("{service} unavailable: {reason}")]
    Upstream {
        service: &'static str,
        reason: String,
    },

    /// A symbol or trading pair is outside what a provider supports.
    #[error("unknown asset: {0}")]
    UnknownAsset(String),

    /// The language model's output could not be parsed into an intent.
    #[error("classification failed: {0}")]
    Classification(String),
}

impl Error {
    pub fn upstream(service: &'static str, reason: impl Into<String>) -> Self {
        Error::Upstream {
            service,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

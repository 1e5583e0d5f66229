//! Unified error types for the arbitrage bot.

use thiserror::Error;

/// Unified error type for the arbitrage bot.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Exchange client error.
    #[error("exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    /// Request signing error.
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the exchange REST clients.
///
/// Connectivity failures (`Http`, `Json`) and exchange-reported rejections
/// (`Rejected`) are distinct classes: a rejection means the request was
/// delivered and the exchange refused it with its own message.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Transport-level failure (network, TLS, timeout).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Json(#[from] serde_json::Error),

    /// The exchange answered with `success: false`.
    #[error("exchange rejected request: {msg}")]
    Rejected {
        /// Error message reported by the exchange.
        msg: String,
    },

    /// The exchange reported success but the payload was missing.
    #[error("exchange response had no payload")]
    MissingPayload,

    /// Request could not be signed.
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),
}

/// Request signing errors. Configuration-class: a secret that cannot be
/// decoded will never produce a valid signature, so startup must not proceed.
#[derive(Error, Debug)]
pub enum SigningError {
    /// API secret is not valid base64.
    #[error("api secret is not valid base64: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    /// The decoded secret was rejected as an HMAC key.
    #[error("api secret rejected as hmac key")]
    KeyRejected,
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;

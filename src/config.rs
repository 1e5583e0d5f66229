//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Which Tauros deployment the bot trades against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Live exchange, real funds.
    Production,
    /// Staging exchange, test funds.
    #[default]
    Staging,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Tauros Credentials ===
    /// API key for the private trading API.
    pub tauros_api_key: String,

    /// API secret (base64) used to sign private requests.
    pub tauros_api_secret: String,

    /// Deployment selector (production or staging).
    #[serde(default)]
    pub environment: Environment,

    // === Strategy Parameters ===
    /// Market traded on the execution venue.
    #[serde(default = "default_market")]
    pub market: String,

    /// Quote currency queried for available balance.
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,

    /// Maximum notional (quote currency) committed to a single order.
    #[serde(default = "default_max_order_value")]
    pub max_order_value: Decimal,

    /// Exchange minimum order notional; anything below is a no-op.
    #[serde(default = "default_min_order_value")]
    pub min_order_value: Decimal,

    /// Minimum bid notional on the reference venue to count as a price signal.
    #[serde(default = "default_reference_min_notional")]
    pub reference_min_notional: Decimal,

    /// Minimum bid notional on the execution venue to count as a price signal.
    #[serde(default = "default_local_min_notional")]
    pub local_min_notional: Decimal,

    /// Increment added above the local best bid.
    #[serde(default = "default_price_delta")]
    pub price_delta: Decimal,

    /// Seconds an order rests on the book before being closed.
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u64,

    /// Pause after an aborted iteration before re-quoting.
    #[serde(default = "default_idle_seconds")]
    pub idle_seconds: u64,

    // === Reference Venue ===
    /// Bitso public API base URL.
    #[serde(default = "default_bitso_url")]
    pub bitso_url: String,

    /// Order book identifier on the reference venue.
    #[serde(default = "default_reference_book")]
    pub reference_book: String,

    // === Alerting (external sink, not used by the core) ===
    /// Email address alerts are sent from.
    #[serde(default)]
    pub sender_email: Option<String>,

    /// Password for the sender account.
    #[serde(default)]
    pub sender_email_password: Option<String>,

    /// Email address alerts are sent to.
    #[serde(default)]
    pub receiver_email: Option<String>,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_market() -> String {
    "BTC-MXN".to_string()
}

fn default_quote_currency() -> String {
    "mxn".to_string()
}

fn default_max_order_value() -> Decimal {
    Decimal::new(20_000, 0)
}

fn default_min_order_value() -> Decimal {
    Decimal::new(10, 0)
}

fn default_reference_min_notional() -> Decimal {
    Decimal::new(500, 0)
}

fn default_local_min_notional() -> Decimal {
    Decimal::new(200, 0)
}

fn default_price_delta() -> Decimal {
    Decimal::ONE
}

fn default_hold_seconds() -> u64 {
    180
}

fn default_idle_seconds() -> u64 {
    5
}

fn default_bitso_url() -> String {
    "https://api.bitso.com".to_string()
}

fn default_reference_book() -> String {
    "btc_mxn".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Environment {
    /// Base URL of the Tauros REST API for this deployment.
    pub fn api_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.tauros.io",
            Environment::Staging => "https://api.staging.tauros.io",
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.tauros_api_key.is_empty() {
            return Err("TAUROS_API_KEY is required".to_string());
        }

        if self.tauros_api_secret.is_empty() {
            return Err("TAUROS_API_SECRET is required".to_string());
        }

        if self.market.is_empty() {
            return Err("MARKET must not be empty".to_string());
        }

        if self.max_order_value <= Decimal::ZERO {
            return Err("MAX_ORDER_VALUE must be positive".to_string());
        }

        if self.price_delta <= Decimal::ZERO {
            return Err("PRICE_DELTA must be positive".to_string());
        }

        Ok(())
    }

    /// Tauros REST base URL for the configured environment.
    pub fn tauros_url(&self) -> &'static str {
        self.environment.api_url()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn test_config() -> Config {
        Config {
            tauros_api_key: "test-key".to_string(),
            tauros_api_secret: "dGVzdC1zZWNyZXQ=".to_string(),
            environment: Environment::Staging,
            market: default_market(),
            quote_currency: default_quote_currency(),
            max_order_value: default_max_order_value(),
            min_order_value: default_min_order_value(),
            reference_min_notional: default_reference_min_notional(),
            local_min_notional: default_local_min_notional(),
            price_delta: default_price_delta(),
            hold_seconds: default_hold_seconds(),
            idle_seconds: default_idle_seconds(),
            bitso_url: default_bitso_url(),
            reference_book: default_reference_book(),
            sender_email: None,
            sender_email_password: None,
            receiver_email: None,
            rust_log: default_log_level(),
        }
    }

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_max_order_value(), dec!(20000));
        assert_eq!(default_reference_min_notional(), dec!(500));
        assert_eq!(default_local_min_notional(), dec!(200));
        assert_eq!(default_price_delta(), dec!(1));
        assert_eq!(default_hold_seconds(), 180);
        assert_eq!(default_market(), "BTC-MXN");
    }

    #[test]
    fn environment_selects_base_url() {
        assert_eq!(Environment::Production.api_url(), "https://api.tauros.io");
        assert_eq!(Environment::Staging.api_url(), "https://api.staging.tauros.io");
    }

    #[test]
    fn validate_accepts_test_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_credentials() {
        let mut config = test_config();
        config.tauros_api_key = String::new();
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.tauros_api_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_limits() {
        let mut config = test_config();
        config.max_order_value = Decimal::ZERO;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.price_delta = dec!(-1);
        assert!(config.validate().is_err());
    }
}

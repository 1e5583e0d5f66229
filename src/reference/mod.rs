//! Reference-market client (Bitso public API).
//!
//! The strategy only needs one thing from the reference venue: the best bid
//! whose notional clears a threshold. This client fetches the order book and
//! maps it into the common [`OrderBook`] shape.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::config::Config;
use crate::error::ExchangeError;
use crate::exchange::types::{BookLevel, OrderBook};
use crate::exchange::MarketData;

const ORDER_BOOK_PATH: &str = "/v3/order_book/";

/// Bitso public API client.
#[derive(Debug, Clone)]
pub struct BitsoClient {
    http: reqwest::Client,
    base_url: String,
}

/// Bitso response envelope.
#[derive(Debug, Deserialize)]
struct BitsoEnvelope {
    success: bool,
    #[serde(default)]
    payload: Option<BitsoBook>,
    #[serde(default)]
    error: Option<BitsoError>,
}

#[derive(Debug, Deserialize)]
struct BitsoError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct BitsoBook {
    bids: Vec<BitsoLevel>,
    asks: Vec<BitsoLevel>,
}

/// Bitso levels report price and base-asset amount as decimal strings.
#[derive(Debug, Deserialize)]
struct BitsoLevel {
    price: Decimal,
    amount: Decimal,
}

impl BitsoClient {
    /// Create a client for the configured reference venue.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .tcp_nodelay(true)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.bitso_url.clone(),
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl MarketData for BitsoClient {
    #[instrument(skip(self))]
    async fn order_book(&self, book: &str) -> Result<OrderBook, ExchangeError> {
        let envelope: BitsoEnvelope = self
            .http
            .get(format!("{}{}", self.base_url, ORDER_BOOK_PATH))
            .query(&[("book", book)])
            .send()
            .await?
            .json()
            .await?;

        if !envelope.success {
            return Err(ExchangeError::Rejected {
                msg: envelope
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "unspecified error".to_string()),
            });
        }

        let payload = envelope.payload.ok_or(ExchangeError::MissingPayload)?;
        Ok(OrderBook {
            bids: payload.bids.into_iter().map(into_level).collect(),
            asks: payload.asks.into_iter().map(into_level).collect(),
        })
    }
}

fn into_level(level: BitsoLevel) -> BookLevel {
    BookLevel {
        price: level.price,
        amount: level.amount,
        value: None,
    }
}

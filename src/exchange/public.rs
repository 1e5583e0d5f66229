//! Unauthenticated Tauros order-book client.

use std::time::Duration;

use serde::Deserialize;
use tracing::instrument;

use crate::config::Config;
use crate::error::ExchangeError;

use super::types::OrderBook;
use super::MarketData;

const ORDER_BOOK_PATH: &str = "/api/v1/trading/orders/";

/// The public endpoint wraps the book in a bare `data` field, without the
/// success flag the private API uses; failures surface at the HTTP layer.
#[derive(Debug, Deserialize)]
struct BookResponse {
    data: OrderBook,
}

/// Tauros public API client. Only the order book is needed.
#[derive(Debug, Clone)]
pub struct TaurosPublicClient {
    http: reqwest::Client,
    base_url: String,
}

impl TaurosPublicClient {
    /// Create a client for the configured environment.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .tcp_nodelay(true)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.tauros_url().to_string(),
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl MarketData for TaurosPublicClient {
    #[instrument(skip(self))]
    async fn order_book(&self, market: &str) -> Result<OrderBook, ExchangeError> {
        let response: BookResponse = self
            .http
            .get(format!("{}{}", self.base_url, ORDER_BOOK_PATH))
            .query(&[("market", market)])
            .send()
            .await?
            .json()
            .await?;

        Ok(response.data)
    }
}

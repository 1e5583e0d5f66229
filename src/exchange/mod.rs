//! Tauros exchange clients and the trait seams the strategy runs against.
//!
//! The strategy engine is generic over these traits so tests can inject
//! [`mock::MockExchange`] instead of live clients.

pub mod mock;
pub mod private;
pub mod public;
pub mod types;

pub use private::TaurosClient;
pub use public::TaurosPublicClient;
pub use types::{NewOrder, OpenOrder, OrderBook, OrderType, PlacedOrder, Side, WalletBalance};

use crate::error::ExchangeError;

/// Authenticated trading operations on the execution venue.
#[allow(async_fn_in_trait)]
pub trait PrivateExchange {
    /// Submit an order. On acceptance the exchange owns it and returns its id.
    async fn place_order(&self, order: &NewOrder) -> Result<PlacedOrder, ExchangeError>;

    /// List the account's open orders, optionally filtered by market.
    async fn open_orders(&self, market: Option<&str>) -> Result<Vec<OpenOrder>, ExchangeError>;

    /// Cancel an open order, releasing its funds.
    async fn close_order(&self, order_id: u64) -> Result<(), ExchangeError>;

    /// Available balance for one currency.
    async fn balance(&self, currency: &str) -> Result<WalletBalance, ExchangeError>;
}

/// Unauthenticated order-book source. Implemented by both venues' public
/// clients; the strategy only ever reads bids.
#[allow(async_fn_in_trait)]
pub trait MarketData {
    /// Fetch the current order book for a market.
    async fn order_book(&self, market: &str) -> Result<OrderBook, ExchangeError>;
}

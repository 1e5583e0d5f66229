//! Mock exchange for unit and integration testing.
//!
//! Implements both trait seams over in-memory state so the strategy engine
//! can run without network access. Failure toggles reproduce the error
//! classes the live clients surface.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use crate::error::ExchangeError;

use super::types::{BookLevel, NewOrder, OpenOrder, OrderBook, PlacedOrder, Side, WalletBalance};
use super::{MarketData, PrivateExchange};

/// Failure toggles for the mock.
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    /// Available quote-currency balance to report.
    pub available_balance: Decimal,
    /// Reject balance queries.
    pub fail_balance: bool,
    /// Reject order placement with this message.
    pub reject_place: Option<String>,
    /// Reject order-book fetches.
    pub fail_order_book: bool,
    /// Order ids whose close is always rejected.
    pub reject_close_ids: HashSet<u64>,
}

/// In-memory exchange double.
#[derive(Debug, Clone, Default)]
pub struct MockExchange {
    behavior: Arc<Mutex<MockBehavior>>,
    books: Arc<Mutex<HashMap<String, OrderBook>>>,
    open_orders: Arc<Mutex<Vec<OpenOrder>>>,
    placed: Arc<Mutex<Vec<NewOrder>>>,
    close_attempts: Arc<Mutex<Vec<u64>>>,
    next_id: Arc<AtomicU64>,
}

impl MockExchange {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(AtomicU64::new(1)),
            ..Self::default()
        }
    }

    /// Replace the failure toggles.
    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// Set the reported available balance.
    pub fn set_balance(&self, available: Decimal) {
        self.behavior.lock().unwrap().available_balance = available;
    }

    /// Install an order book for a market.
    pub fn set_order_book(&self, market: impl Into<String>, book: OrderBook) {
        self.books.lock().unwrap().insert(market.into(), book);
    }

    /// Seed a resting open order (a stray for recovery to deal with).
    pub fn seed_open_order(&self, order_id: u64, market: impl Into<String>, side: Side) {
        self.open_orders.lock().unwrap().push(OpenOrder {
            order_id,
            market: Some(market.into()),
            side,
            amount: None,
            price: None,
        });
    }

    /// Every order submitted through `place_order`, in order.
    pub fn placed_orders(&self) -> Vec<NewOrder> {
        self.placed.lock().unwrap().clone()
    }

    /// Every close attempt, in order, including rejected ones.
    pub fn close_attempts(&self) -> Vec<u64> {
        self.close_attempts.lock().unwrap().clone()
    }

    /// Ids of orders still open.
    pub fn open_order_ids(&self) -> Vec<u64> {
        self.open_orders
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.order_id)
            .collect()
    }
}

impl PrivateExchange for MockExchange {
    async fn place_order(&self, order: &NewOrder) -> Result<PlacedOrder, ExchangeError> {
        if let Some(msg) = self.behavior.lock().unwrap().reject_place.clone() {
            return Err(ExchangeError::Rejected { msg });
        }

        self.placed.lock().unwrap().push(order.clone());

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.open_orders.lock().unwrap().push(OpenOrder {
            order_id: id,
            market: Some(order.market.clone()),
            side: order.side,
            amount: order.amount.parse().ok(),
            price: order.price.parse().ok(),
        });

        Ok(PlacedOrder {
            id,
            market: Some(order.market.clone()),
            side: Some(order.side),
        })
    }

    async fn open_orders(&self, market: Option<&str>) -> Result<Vec<OpenOrder>, ExchangeError> {
        let orders = self.open_orders.lock().unwrap();
        Ok(orders
            .iter()
            .filter(|o| match market {
                Some(m) => o.market.as_deref() == Some(m),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn close_order(&self, order_id: u64) -> Result<(), ExchangeError> {
        self.close_attempts.lock().unwrap().push(order_id);

        if self
            .behavior
            .lock()
            .unwrap()
            .reject_close_ids
            .contains(&order_id)
        {
            return Err(ExchangeError::Rejected {
                msg: format!("mock refuses to close order {}", order_id),
            });
        }

        self.open_orders
            .lock()
            .unwrap()
            .retain(|o| o.order_id != order_id);
        Ok(())
    }

    async fn balance(&self, _currency: &str) -> Result<WalletBalance, ExchangeError> {
        let behavior = self.behavior.lock().unwrap();
        if behavior.fail_balance {
            return Err(ExchangeError::Rejected {
                msg: "mock balance failure".to_string(),
            });
        }
        Ok(WalletBalance {
            available: behavior.available_balance,
            pending: None,
        })
    }
}

impl MarketData for MockExchange {
    async fn order_book(&self, market: &str) -> Result<OrderBook, ExchangeError> {
        if self.behavior.lock().unwrap().fail_order_book {
            return Err(ExchangeError::Rejected {
                msg: "mock order book failure".to_string(),
            });
        }

        let books = self.books.lock().unwrap();
        Ok(books.get(market).cloned().unwrap_or_default())
    }
}

/// Build a book whose bids carry base-asset amounts (reference-venue shape).
pub fn book_with_amounts(bids: &[(Decimal, Decimal)]) -> OrderBook {
    OrderBook {
        bids: bids
            .iter()
            .map(|&(price, amount)| BookLevel {
                price,
                amount,
                value: None,
            })
            .collect(),
        asks: Vec::new(),
    }
}

/// Build a book whose bids carry reported notionals (execution-venue shape).
pub fn book_with_values(bids: &[(Decimal, Decimal)]) -> OrderBook {
    OrderBook {
        bids: bids
            .iter()
            .map(|&(price, value)| BookLevel {
                price,
                amount: Decimal::ZERO,
                value: Some(value),
            })
            .collect(),
        asks: Vec::new(),
    }
}

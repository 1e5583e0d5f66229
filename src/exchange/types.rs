//! Wire types for the Tauros REST API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ExchangeError;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order.
    #[strum(to_string = "BUY", serialize = "buy")]
    Buy,
    /// Sell order.
    #[strum(to_string = "SELL", serialize = "sell")]
    Sell,
}

/// Order type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Limit order: rests on the book at the given price.
    #[default]
    #[strum(to_string = "LIMIT", serialize = "limit")]
    Limit,
    /// Market order: fills immediately at the best available price.
    #[strum(to_string = "MARKET", serialize = "market")]
    Market,
}

/// Order submitted to the exchange.
///
/// Field order is canonical: the serialized form is signed byte-for-byte, so
/// fields must serialize in exactly this order. Amounts travel as decimal
/// strings, matching what the exchange echoes back.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    /// Market identifier, e.g. `BTC-MXN`.
    pub market: String,
    /// Order amount as a decimal string.
    pub amount: String,
    /// When true, `amount` is a quote-currency value rather than a base quantity.
    pub is_amount_value: bool,
    /// Order side.
    pub side: Side,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Limit price as a decimal string.
    pub price: String,
}

impl NewOrder {
    /// Create a limit buy for `value` quote currency at `price`.
    pub fn limit_buy(market: impl Into<String>, value: Decimal, price: Decimal) -> Self {
        Self {
            market: market.into(),
            amount: value.to_string(),
            is_amount_value: true,
            side: Side::Buy,
            order_type: OrderType::Limit,
            price: price.to_string(),
        }
    }
}

/// Payload returned when an order is accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacedOrder {
    /// Exchange-assigned order id.
    pub id: u64,
    /// Market the order was placed on.
    #[serde(default)]
    pub market: Option<String>,
    /// Order side as echoed by the exchange.
    #[serde(default)]
    pub side: Option<Side>,
}

/// One of the account's open orders.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenOrder {
    /// Exchange-assigned order id.
    pub order_id: u64,
    /// Market the order rests on.
    #[serde(default)]
    pub market: Option<String>,
    /// Order side.
    pub side: Side,
    /// Remaining amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Limit price.
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Wallet balances for a single currency.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletBalance {
    /// Funds available for new orders.
    pub available: Decimal,
    /// Funds locked in open orders.
    #[serde(default)]
    pub pending: Option<Decimal>,
}

/// `data` payload of the get-balance endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceData {
    /// Balance breakdown.
    pub balances: WalletBalance,
}

/// Response envelope used by every Tauros endpoint.
///
/// Failure is signaled by `success: false` plus a message, not by HTTP
/// status; transport problems surface earlier as connectivity errors.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the exchange accepted the request.
    pub success: bool,
    /// Payload, present on success. A missing field decodes as `None`, so
    /// no default is needed (and one would force a `Default` bound on `T`).
    pub data: Option<T>,
    /// Error message, present on failure.
    #[serde(default)]
    pub msg: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Convert the envelope into a typed result.
    pub fn into_result(self) -> Result<T, ExchangeError> {
        if !self.success {
            return Err(ExchangeError::Rejected {
                msg: self.msg.unwrap_or_else(|| "unspecified error".to_string()),
            });
        }
        self.data.ok_or(ExchangeError::MissingPayload)
    }
}

/// Single price level in an order book.
///
/// Venues disagree on shape: Tauros reports each level's `value` (notional)
/// directly, Bitso reports `amount` only. `notional()` hides the difference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookLevel {
    /// Price at this level.
    pub price: Decimal,
    /// Base-asset quantity at this level.
    #[serde(default)]
    pub amount: Decimal,
    /// Quote-currency value at this level, when the venue reports it.
    #[serde(default)]
    pub value: Option<Decimal>,
}

impl BookLevel {
    /// Quote-currency value of this level.
    pub fn notional(&self) -> Decimal {
        self.value.unwrap_or(self.price * self.amount)
    }
}

/// Order book snapshot, best price first on each side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderBook {
    /// Buy-side levels, best (highest) price first.
    pub bids: Vec<BookLevel>,
    /// Sell-side levels, best (lowest) price first.
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    /// Price of the first bid, in book order, whose notional meets the
    /// threshold. Thin bids below the threshold are skipped: they are too
    /// small to be a reliable price signal.
    pub fn signal_bid(&self, min_notional: Decimal) -> Option<Decimal> {
        self.bids
            .iter()
            .find(|level| level.notional() >= min_notional)
            .map(|level| level.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn new_order_serializes_in_canonical_field_order() {
        let order = NewOrder::limit_buy("BTC-MXN", dec!(15000), dec!(991));
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(
            json,
            r#"{"market":"BTC-MXN","amount":"15000","is_amount_value":true,"side":"BUY","type":"LIMIT","price":"991"}"#
        );
    }

    #[test]
    fn envelope_success_yields_payload() {
        let envelope: ApiEnvelope<PlacedOrder> =
            serde_json::from_str(r#"{"success":true,"data":{"id":42}}"#).unwrap();
        let placed = envelope.into_result().unwrap();
        assert_eq!(placed.id, 42);
    }

    #[test]
    fn envelope_failure_carries_exchange_message() {
        let envelope: ApiEnvelope<PlacedOrder> =
            serde_json::from_str(r#"{"success":false,"msg":"Insufficient funds"}"#).unwrap();
        match envelope.into_result() {
            Err(ExchangeError::Rejected { msg }) => assert_eq!(msg, "Insufficient funds"),
            other => panic!("expected rejection, got {:?}", other.map(|p| p.id)),
        }
    }

    #[test]
    fn envelope_success_without_payload_is_an_error() {
        let envelope: ApiEnvelope<PlacedOrder> =
            serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(
            envelope.into_result(),
            Err(ExchangeError::MissingPayload)
        ));
    }

    #[test]
    fn signal_bid_skips_thin_levels() {
        let book = OrderBook {
            bids: vec![
                BookLevel { price: dec!(1000), amount: dec!(0.1), value: None }, // notional 100
                BookLevel { price: dec!(990), amount: dec!(1), value: None },    // notional 990
            ],
            asks: vec![],
        };
        assert_eq!(book.signal_bid(dec!(500)), Some(dec!(990)));
    }

    #[test]
    fn signal_bid_threshold_is_inclusive() {
        let book = OrderBook {
            bids: vec![BookLevel { price: dec!(990), amount: Decimal::ZERO, value: Some(dec!(250)) }],
            asks: vec![],
        };
        assert_eq!(book.signal_bid(dec!(250)), Some(dec!(990)));
        assert_eq!(book.signal_bid(dec!(251)), None);
    }

    #[test]
    fn signal_bid_prefers_reported_value_over_computed() {
        let level = BookLevel { price: dec!(990), amount: dec!(5), value: Some(dec!(250)) };
        assert_eq!(level.notional(), dec!(250));
    }

    #[test]
    fn signal_bid_empty_book_is_no_signal() {
        assert_eq!(OrderBook::default().signal_bid(dec!(1)), None);
    }

    #[test]
    fn side_parses_both_cases() {
        use std::str::FromStr;
        assert_eq!(Side::from_str("BUY").unwrap(), Side::Buy);
        assert_eq!(Side::from_str("sell").unwrap(), Side::Sell);
    }

    #[test]
    fn side_and_type_display_uppercase() {
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(Side::Sell.to_string(), "SELL");
        assert_eq!(OrderType::Limit.to_string(), "LIMIT");
        assert_eq!(OrderType::Market.to_string(), "MARKET");
    }
}

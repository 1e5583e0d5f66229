//! Pure pricing arithmetic for the buy-side strategy.

use rust_decimal::Decimal;

/// Price for the next limit buy.
///
/// One step above the local best bid, clamped to the cross-venue reference
/// price: improving on the local book is what captures the spread, and the
/// clamp is what keeps the order from ever paying more than the reference
/// venue would.
pub fn order_price(max_price: Decimal, local_bid: Decimal, delta: Decimal) -> Decimal {
    if local_bid > max_price {
        max_price
    } else {
        (local_bid + delta).min(max_price)
    }
}

/// Notional committed to the next order: the full available balance, capped.
pub fn order_notional(available: Decimal, max_order_value: Decimal) -> Decimal {
    available.min(max_order_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn price_clamps_when_local_bid_exceeds_reference() {
        assert_eq!(order_price(dec!(1000), dec!(1005), dec!(1)), dec!(1000));
        assert_eq!(order_price(dec!(1000), dec!(1000.01), dec!(1)), dec!(1000));
    }

    #[test]
    fn price_improves_on_local_bid_by_delta() {
        assert_eq!(order_price(dec!(1000), dec!(990), dec!(1)), dec!(991));
        assert_eq!(order_price(dec!(500000), dec!(498000), dec!(1)), dec!(498001));
    }

    #[test]
    fn price_never_exceeds_reference_bound() {
        // Local bid within delta of the bound: the increment would cross it.
        assert_eq!(order_price(dec!(1000), dec!(999.5), dec!(1)), dec!(1000));

        for local in [dec!(900), dec!(999), dec!(999.99), dec!(1000), dec!(1200)] {
            assert!(order_price(dec!(1000), local, dec!(1)) <= dec!(1000));
        }
    }

    #[test]
    fn notional_is_balance_capped_by_max() {
        assert_eq!(order_notional(dec!(15000), dec!(20000)), dec!(15000));
        assert_eq!(order_notional(dec!(25000), dec!(20000)), dec!(20000));
        assert_eq!(order_notional(dec!(0), dec!(20000)), dec!(0));
    }
}

//! Order lifecycle state machine.
//!
//! One iteration walks `Quoting → BalanceCheck → PlaceOrder → Holding →
//! Closing → Done`. Any failure before placement aborts the iteration; the
//! next pass re-derives fresh state from the exchange, which is the only
//! retry mechanism. A failed close triggers recovery: close every open buy
//! order so no exposure is left unmanaged.

use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::error::ExchangeError;
use crate::exchange::types::{NewOrder, Side};
use crate::exchange::{MarketData, PrivateExchange};

use super::pricing;

/// States of one strategy iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
    /// Fetch both order books and derive the price signals.
    Quoting,
    /// Query available balance and size the order.
    BalanceCheck {
        /// Limit price derived during quoting.
        price: Decimal,
    },
    /// Submit the limit buy.
    PlaceOrder {
        /// Limit price.
        price: Decimal,
        /// Quote-currency value of the order.
        notional: Decimal,
    },
    /// Let the order rest on the book for the hold duration.
    Holding {
        /// Exchange-assigned id of the resting order.
        order_id: u64,
    },
    /// Cancel the resting order.
    Closing {
        /// Order to cancel.
        order_id: u64,
    },
    /// Iteration finished.
    Done(IterationOutcome),
}

/// How an iteration ended. Everything except `Closed` and
/// `RecoveredAfterFailedClose` is a quiet no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Full cycle: order placed, held, and closed.
    Closed {
        /// The order that was closed.
        order_id: u64,
    },
    /// The close failed; recovery closed this many stray buy orders.
    RecoveredAfterFailedClose {
        /// Orders closed during recovery.
        closed: usize,
    },
    /// An order book could not be fetched.
    BookUnavailable,
    /// No reference bid met the notional threshold.
    NoReferenceSignal,
    /// No local bid met the notional threshold.
    NoLocalSignal,
    /// Balance query failed.
    BalanceUnavailable,
    /// Computable order size was zero or below the exchange minimum.
    NothingToSpend,
    /// The exchange refused the order.
    PlacementRejected,
}

impl IterationOutcome {
    /// True when the iteration ended before an order was placed.
    pub fn aborted_early(&self) -> bool {
        !matches!(
            self,
            IterationOutcome::Closed { .. } | IterationOutcome::RecoveredAfterFailedClose { .. }
        )
    }
}

/// Drives the strategy against injected exchange clients.
#[derive(Debug)]
pub struct StrategyEngine<P, L, R> {
    private: P,
    local: L,
    reference: R,
    config: Config,
}

impl<P, L, R> StrategyEngine<P, L, R>
where
    P: PrivateExchange,
    L: MarketData,
    R: MarketData,
{
    /// Create an engine over the given clients.
    pub fn new(private: P, local: L, reference: R, config: Config) -> Self {
        Self {
            private,
            local,
            reference,
            config,
        }
    }

    /// Close every open buy order on the execution market.
    ///
    /// Run at startup and after a failed close. Individual close failures
    /// are logged and skipped; a stray order is better reported than fatal.
    #[instrument(skip(self))]
    pub async fn recover(&self) -> Result<usize, ExchangeError> {
        let open = self.private.open_orders(Some(&self.config.market)).await?;

        let buy_ids: Vec<u64> = open
            .iter()
            .filter(|order| order.side == Side::Buy)
            .map(|order| order.order_id)
            .collect();

        info!(count = buy_ids.len(), ids = ?buy_ids, "open buy orders to close");

        let mut closed = 0usize;
        for order_id in buy_ids {
            match self.private.close_order(order_id).await {
                Ok(()) => {
                    debug!(order_id, "stray order closed");
                    closed += 1;
                }
                Err(e) => {
                    warn!(order_id, error = %e, "failed to close stray order, skipping");
                }
            }
        }

        info!(closed, "recovery complete");
        Ok(closed)
    }

    /// Perform one state's work and return the next state.
    pub async fn advance(&self, state: State) -> State {
        match state {
            State::Quoting => self.quote().await,
            State::BalanceCheck { price } => self.check_balance(price).await,
            State::PlaceOrder { price, notional } => self.place(price, notional).await,
            State::Holding { order_id } => self.hold(order_id).await,
            State::Closing { order_id } => self.close(order_id).await,
            done @ State::Done(_) => done,
        }
    }

    /// Drive one full iteration from quoting to completion.
    pub async fn run_iteration(&self) -> IterationOutcome {
        let mut state = State::Quoting;
        loop {
            match self.advance(state).await {
                State::Done(outcome) => return outcome,
                next => state = next,
            }
        }
    }

    /// Recover, then run iterations forever. Returns only when the process
    /// is torn down around it.
    pub async fn run(&self) {
        if let Err(e) = self.recover().await {
            error!(error = %e, "startup recovery failed, continuing");
        }

        loop {
            let outcome = self.run_iteration().await;
            if outcome.aborted_early() {
                debug!(?outcome, "iteration aborted, idling before next pass");
                tokio::time::sleep(Duration::from_secs(self.config.idle_seconds)).await;
            }
        }
    }

    async fn quote(&self) -> State {
        let reference_book = match self.reference.order_book(&self.config.reference_book).await {
            Ok(book) => book,
            Err(e) => {
                warn!(error = %e, "reference order book unavailable");
                return State::Done(IterationOutcome::BookUnavailable);
            }
        };

        let Some(max_price) = reference_book.signal_bid(self.config.reference_min_notional) else {
            debug!("no reference bid meets the notional threshold");
            return State::Done(IterationOutcome::NoReferenceSignal);
        };
        info!(%max_price, "reference bid signal");

        let local_book = match self.local.order_book(&self.config.market).await {
            Ok(book) => book,
            Err(e) => {
                warn!(error = %e, "local order book unavailable");
                return State::Done(IterationOutcome::BookUnavailable);
            }
        };

        let Some(local_bid) = local_book.signal_bid(self.config.local_min_notional) else {
            debug!("no local bid meets the notional threshold");
            return State::Done(IterationOutcome::NoLocalSignal);
        };
        info!(%local_bid, "local bid signal");

        let price = pricing::order_price(max_price, local_bid, self.config.price_delta);
        State::BalanceCheck { price }
    }

    async fn check_balance(&self, price: Decimal) -> State {
        let wallet = match self.private.balance(&self.config.quote_currency).await {
            Ok(wallet) => wallet,
            Err(e) => {
                warn!(error = %e, "balance query failed");
                return State::Done(IterationOutcome::BalanceUnavailable);
            }
        };

        let notional = pricing::order_notional(wallet.available, self.config.max_order_value);
        if notional <= Decimal::ZERO || notional < self.config.min_order_value {
            info!(%notional, available = %wallet.available, "order value below minimum, skipping");
            return State::Done(IterationOutcome::NothingToSpend);
        }

        State::PlaceOrder { price, notional }
    }

    async fn place(&self, price: Decimal, notional: Decimal) -> State {
        let order = NewOrder::limit_buy(self.config.market.clone(), notional, price);

        match self.private.place_order(&order).await {
            Ok(placed) => {
                info!(order_id = placed.id, %price, %notional, "buy order placed");
                State::Holding {
                    order_id: placed.id,
                }
            }
            Err(e) => {
                warn!(error = %e, "could not place buy order");
                State::Done(IterationOutcome::PlacementRejected)
            }
        }
    }

    async fn hold(&self, order_id: u64) -> State {
        // The order rests unattended; fills during this window are not
        // monitored and the close below is issued regardless of fill state.
        info!(order_id, hold_seconds = self.config.hold_seconds, "holding order");
        tokio::time::sleep(Duration::from_secs(self.config.hold_seconds)).await;
        State::Closing { order_id }
    }

    async fn close(&self, order_id: u64) -> State {
        match self.private.close_order(order_id).await {
            Ok(()) => {
                info!(order_id, "order closed");
                State::Done(IterationOutcome::Closed { order_id })
            }
            Err(e) => {
                error!(order_id, error = %e, "close failed, recovering all open buys");
                let closed = match self.recover().await {
                    Ok(closed) => closed,
                    Err(recover_err) => {
                        error!(error = %recover_err, "recovery failed");
                        0
                    }
                };
                State::Done(IterationOutcome::RecoveredAfterFailedClose { closed })
            }
        }
    }
}

//! BTC-MXN cross-venue arbitrage bot for the Tauros exchange.
//!
//! The strategy keeps a limit buy resting on the Tauros book, priced one
//! step above the local best bid but never above the best bid on Bitso (the
//! reference venue):
//!
//! ```text
//! Bitso best bid:   $1000  (arbitrage bound)
//! Tauros best bid:   $990
//! ─────────────────────────
//! Our order:         $991  = min(1000, 990 + 1)
//! ```
//!
//! Each iteration places the order, holds it for a fixed window, then closes
//! it and starts over. Stray buy orders left by a crash or a failed close are
//! swept by the recovery procedure at startup.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`signing`]: HMAC request signing and nonces
//! - [`exchange`]: Tauros clients and the trait seams
//! - [`reference`]: Bitso reference-market client
//! - [`strategy`]: Pricing and the order lifecycle engine

pub mod config;
pub mod error;
pub mod exchange;
pub mod reference;
pub mod signing;
pub mod strategy;

pub use config::Config;
pub use error::{BotError, Result};

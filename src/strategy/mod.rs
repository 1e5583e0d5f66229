//! Arbitrage strategy: pricing arithmetic and the order lifecycle engine.

pub mod engine;
pub mod pricing;

pub use engine::{IterationOutcome, State, StrategyEngine};

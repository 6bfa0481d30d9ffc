//! Error types for the idle-factories simulation and its configuration.

use rust_decimal::Decimal;
use thiserror::Error;

use super::state::FactoryKind;

/// Errors raised by checked simulation commands.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A checked purchase was refused because the score is below the price.
    #[error("cannot afford {}: price {price}, score {score}", .kind.name())]
    Unaffordable {
        kind: FactoryKind,
        price: Decimal,
        score: Decimal,
    },
    /// The simulation was disposed and can no longer be started.
    #[error("simulation has been disposed")]
    Disposed,
}

/// Errors raised while reading a [`SimConfig`](super::config::SimConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

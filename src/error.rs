//! Error types for the order book and the market registry.

use thiserror::Error;

use crate::types::OrderId;

/// Errors surfaced by book and registry operations.
///
/// None of these are fatal. Every mutating operation validates before it
/// touches any state, so the book is unchanged whenever one is returned.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-positive size or price, or an order that cannot be placed as-is
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Cancel of an order that is not resting on the book
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// Market identifier with no registered order book
    #[error("market not found: {0}")]
    MarketNotFound(String),

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

//! Core data types for the limit order book
//!
//! ## Types
//!
//! - [`Order`]: A resting or incoming order intent
//! - [`OrderId`]: Collision-free order identifier
//! - [`Side`]: Buy or Sell, including the price-priority rules for each
//! - [`Match`]: A fill between a resting order and an aggressor
//!
//! ## Numeric Model
//!
//! Prices and sizes are `rust_decimal::Decimal`. Price levels are keyed by
//! exact decimal equality, so `10000` and `10000.00` share a level.
//! [`quantity`] bounds their scale and magnitude so that running volume
//! totals stay exact.

mod order;
mod fill;
pub mod quantity;

pub use order::{Order, OrderId, Side};
pub use fill::Match;

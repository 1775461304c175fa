//! # Limit Book
//!
//! In-memory limit order book for a single trading market, plus a thin
//! registry for running several markets side by side.
//!
//! ## Architecture
//!
//! - **Types**: Order, Side, Match
//! - **OrderBook**: price levels, book sides, and price-time matching
//! - **Engine**: market registry with per-market locking
//!
//! ## Design Principles
//!
//! 1. **Price-Time Priority**: best price first, then FIFO within a price
//! 2. **Exact Decimals**: prices and sizes are `rust_decimal::Decimal`
//! 3. **All-or-Nothing Operations**: invalid requests never touch the book
//! 4. **Synchronous Execution**: every operation is computation-bound
//!
//! The book reports matches; it never settles them.

// ============================================================================
// Module declarations
// ============================================================================

/// Error type and `Result` alias
pub mod error;

/// Book and registry configuration
pub mod config;

/// Core data types: Order, Side, Match
pub mod types;

/// Order book: levels, sides, matching
pub mod orderbook;

/// Market registry
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use error::{Error, Result};
pub use types::{Match, Order, OrderId, Side};
pub use orderbook::{BookSide, BookSnapshot, LimitPlacement, Orderbook, PriceLevel};
pub use engine::Exchange;

//! Market registry for the limit order book.
//!
//! ## Concurrency
//!
//! - Each market has exactly one [`Orderbook`](crate::orderbook::Orderbook)
//!   behind its own read/write lock
//! - Mutations (place limit, place market, cancel) are serialized per market
//! - Queries share the read lock and never see a half-applied match
//! - Different markets can be driven from different threads in parallel
//!
//! Settlement of matches is left to the caller.

pub mod exchange;

pub use exchange::{Exchange, SharedBook};

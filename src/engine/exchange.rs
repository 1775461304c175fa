//! Registry mapping market identifiers to order books.
//!
//! Each market's book sits behind its own `parking_lot::RwLock`. Every
//! mutating call holds the write lock for the whole operation, so matching
//! is never observed half-applied; queries share the read lock. Distinct
//! markets never contend with each other.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::info;

use crate::config::{BookConfig, ExchangeConfig};
use crate::error::{Error, Result};
use crate::orderbook::{BookSnapshot, LimitPlacement, Orderbook};
use crate::types::{Match, Order, OrderId};

/// Shared handle to one market's book
pub type SharedBook = Arc<RwLock<Orderbook>>;

/// Market registry.
///
/// ## Example
///
/// ```
/// use limit_book::engine::Exchange;
/// use limit_book::types::{Order, Side};
/// use rust_decimal::Decimal;
///
/// let exchange = Exchange::default();
/// let ask = Order::new(Side::Sell, Decimal::from(3)).unwrap();
/// exchange.place_limit_order("ETH", Decimal::from(2_000), ask).unwrap();
///
/// assert_eq!(exchange.best_ask("ETH").unwrap(), Some(Decimal::from(2_000)));
/// assert!(exchange.best_ask("DOGE").is_err());
/// ```
#[derive(Debug)]
pub struct Exchange {
    markets: HashMap<String, SharedBook>,
    book_config: BookConfig,
}

impl Default for Exchange {
    fn default() -> Self {
        Self::from_config(&ExchangeConfig::default())
    }
}

impl Exchange {
    /// Create a registry with no markets
    ///
    /// # Arguments
    ///
    /// * `book_config` - Settings applied to every book added later
    pub fn new(book_config: BookConfig) -> Self {
        Self {
            markets: HashMap::new(),
            book_config,
        }
    }

    /// Create a registry with every market named in `config`
    pub fn from_config(config: &ExchangeConfig) -> Self {
        let mut exchange = Self::new(config.book.clone());
        for market in &config.markets {
            exchange.add_market(market);
        }
        exchange
    }

    /// Register an empty book for `market`.
    ///
    /// Returns false if the market already exists; its book is left alone.
    pub fn add_market(&mut self, market: &str) -> bool {
        if self.markets.contains_key(market) {
            return false;
        }
        let book = Orderbook::with_capacity(self.book_config.order_capacity);
        self.markets.insert(market.to_string(), Arc::new(RwLock::new(book)));
        info!(market, capacity = self.book_config.order_capacity, "market registered");
        true
    }

    /// Registered market names, sorted
    pub fn markets(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.markets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Shared handle to a market's book
    ///
    /// # Errors
    ///
    /// `Error::MarketNotFound` for an unregistered market.
    pub fn book(&self, market: &str) -> Result<SharedBook> {
        self.markets
            .get(market)
            .cloned()
            .ok_or_else(|| Error::MarketNotFound(market.to_string()))
    }

    fn with_book<T>(&self, market: &str, f: impl FnOnce(&Orderbook) -> T) -> Result<T> {
        let book = self.lookup(market)?;
        let guard = book.read();
        Ok(f(&*guard))
    }

    fn with_book_mut<T>(&self, market: &str, f: impl FnOnce(&mut Orderbook) -> Result<T>) -> Result<T> {
        let book = self.lookup(market)?;
        let mut guard = book.write();
        f(&mut *guard)
    }

    fn lookup(&self, market: &str) -> Result<&SharedBook> {
        self.markets
            .get(market)
            .ok_or_else(|| Error::MarketNotFound(market.to_string()))
    }

    // ========================================================================
    // Mutating operations
    // ========================================================================

    /// Place a limit order on `market`; see [`Orderbook::place_limit_order`].
    ///
    /// # Errors
    ///
    /// `Error::MarketNotFound` for an unregistered market, otherwise whatever
    /// the book reports.
    pub fn place_limit_order(&self, market: &str, price: Decimal, order: Order) -> Result<LimitPlacement> {
        self.with_book_mut(market, |book| book.place_limit_order(price, order))
    }

    /// Execute a market order on `market`; see [`Orderbook::place_market_order`].
    pub fn place_market_order(&self, market: &str, order: &mut Order) -> Result<Vec<Match>> {
        self.with_book_mut(market, |book| book.place_market_order(order))
    }

    /// Cancel a resting order on `market`.
    ///
    /// Ids are scoped to the book that issued the placement; an id from
    /// another market reports `Error::OrderNotFound`.
    pub fn cancel_order(&self, market: &str, order_id: OrderId) -> Result<Order> {
        self.with_book_mut(market, |book| book.cancel_order(order_id))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Highest resting buy price on `market`
    pub fn best_bid(&self, market: &str) -> Result<Option<Decimal>> {
        self.with_book(market, Orderbook::best_bid)
    }

    /// Lowest resting sell price on `market`
    pub fn best_ask(&self, market: &str) -> Result<Option<Decimal>> {
        self.with_book(market, Orderbook::best_ask)
    }

    /// Total resting bid size on `market`
    pub fn bid_total_volume(&self, market: &str) -> Result<Decimal> {
        self.with_book(market, Orderbook::bid_total_volume)
    }

    /// Total resting ask size on `market`
    pub fn ask_total_volume(&self, market: &str) -> Result<Decimal> {
        self.with_book(market, Orderbook::ask_total_volume)
    }

    /// Consistent copy of `market`'s book, taken under one read lock
    pub fn snapshot(&self, market: &str) -> Result<BookSnapshot> {
        self.with_book(market, Orderbook::snapshot)
    }
}

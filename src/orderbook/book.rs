//! Limit order book for a single market.
//!
//! ## Architecture
//!
//! - **Slab**: storage for resting orders, O(1) insert/remove/lookup
//! - **BookSide** (x2): price index plus best-price ordering per side
//! - **HashMap**: order id to slab key, for O(1) cancel
//!
//! ## Matching
//!
//! One loop serves both directions. The aggressor's [`Side`] picks the
//! opposite book side and decides which resting prices it accepts. Liquidity
//! is consumed best price first, then oldest order first within a price.
//! A partially filled resting order keeps its place at the head of its level.
//!
//! ## Example
//!
//! ```
//! use limit_book::orderbook::Orderbook;
//! use limit_book::types::{Order, Side};
//! use rust_decimal::Decimal;
//!
//! let mut book = Orderbook::new();
//!
//! let ask = Order::new(Side::Sell, Decimal::from(20)).unwrap();
//! book.place_limit_order(Decimal::from(10_000), ask).unwrap();
//!
//! let mut buy = Order::new(Side::Buy, Decimal::from(10)).unwrap();
//! let matches = book.place_market_order(&mut buy).unwrap();
//!
//! assert_eq!(matches.len(), 1);
//! assert!(buy.is_filled());
//! assert_eq!(book.ask_total_volume(), Decimal::from(10));
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;
use slab::Slab;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::orderbook::{BookSide, BookSnapshot, OrderNode};
use crate::types::{quantity, Match, Order, OrderId, Side};

/// Outcome of a limit order placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitPlacement {
    /// Id of the placed order
    pub order_id: OrderId,

    /// Fills produced while crossing the book, in execution order
    pub matches: Vec<Match>,

    /// Whether the order now rests on the book
    pub resting: bool,

    /// Size left after matching (resting size when `resting` is true)
    pub remaining: Decimal,
}

/// Price-time priority order book
#[derive(Debug)]
pub struct Orderbook {
    /// Resting order storage
    orders: Slab<OrderNode>,

    bids: BookSide,
    asks: BookSide,

    /// Order id to slab key, for every resting order
    order_index: HashMap<OrderId, usize>,

    /// Next match sequence number
    next_sequence: u64,
}

impl Default for Orderbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Orderbook {
    /// Create a new empty book
    ///
    /// # Example
    ///
    /// ```
    /// use limit_book::orderbook::Orderbook;
    ///
    /// let book = Orderbook::new();
    /// assert!(book.is_empty());
    /// assert!(book.best_bid().is_none());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a book with room for `order_capacity` resting orders
    ///
    /// # Arguments
    ///
    /// * `order_capacity` - Slots pre-allocated in the order slab and index
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
            order_index: HashMap::with_capacity(order_capacity),
            next_sequence: 1,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Pre-allocated slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Number of resting orders on both sides
    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_index.len()
    }

    /// True if nothing rests on either side
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_index.is_empty()
    }

    /// Buy side, highest price first
    #[inline]
    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    /// Sell side, lowest price first
    #[inline]
    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    /// The side holding orders of `side`
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Resting order by id
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        let key = self.order_index.get(&order_id)?;
        self.orders.get(*key).map(|node| &node.order)
    }

    /// Whether an order with this id is resting on the book
    #[inline]
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Highest resting buy price
    #[inline]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.best_price()
    }

    /// Lowest resting sell price
    #[inline]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.best_price()
    }

    /// best_ask - best_bid, or None if either side is empty
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }

    /// Sum of remaining sizes across all bid levels
    #[inline]
    pub fn bid_total_volume(&self) -> Decimal {
        self.bids.total_volume()
    }

    /// Sum of remaining sizes across all ask levels
    #[inline]
    pub fn ask_total_volume(&self) -> Decimal {
        self.asks.total_volume()
    }

    /// Copy of both sides, best price first, orders in queue order
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot::capture(&self.bids, &self.asks, &self.orders)
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Place a limit order at `price`.
    ///
    /// The order first trades against opposite-side liquidity its limit
    /// accepts. Any remainder rests at `price`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidOrder` if the price is out of bounds (see
    /// [`quantity::validate`]), the order cannot be placed (already resting,
    /// or nothing left to fill), or resting it could push its side's volume
    /// past [`quantity::MAX_VALUE`]. The book is not touched in that case.
    pub fn place_limit_order(&mut self, price: Decimal, mut order: Order) -> Result<LimitPlacement> {
        if let Err(err) = quantity::validate("price", price) {
            debug!(order_id = %order.id(), %price, "rejected limit order price");
            return Err(err);
        }
        self.validate_incoming(&order)?;

        // Matching only drains the opposite side, so this bound holds for
        // whatever remainder ends up resting.
        let own_volume = self.side(order.side()).total_volume();
        if quantity::checked_add(own_volume, order.remaining()).is_none() {
            debug!(order_id = %order.id(), %own_volume, "rejected limit order over side capacity");
            return Err(Error::InvalidOrder(format!(
                "resting {} would push {} volume past {}",
                order.remaining(),
                order.side(),
                quantity::MAX_VALUE
            )));
        }

        let order_id = order.id();
        let side = order.side();
        debug!(%order_id, %side, %price, size = %order.remaining(), "placing limit order");

        let matches = self.match_incoming(&mut order, Some(price));
        let remaining = order.remaining();
        let resting = !order.is_filled();

        if resting {
            let key = self.orders.insert(OrderNode::new(order));
            match side {
                Side::Buy => self.bids.insert(price, key, &mut self.orders),
                Side::Sell => self.asks.insert(price, key, &mut self.orders),
            }
            self.order_index.insert(order_id, key);
            debug!(%order_id, %side, %price, %remaining, "order resting");
        }

        Ok(LimitPlacement {
            order_id,
            matches,
            resting,
            remaining,
        })
    }

    /// Execute a market order against the best available opposite prices.
    ///
    /// Market orders never rest: whatever remains once the opposite side is
    /// exhausted is dropped. The caller keeps `order` and can read its
    /// remaining and filled size afterwards.
    ///
    /// # Errors
    ///
    /// `Error::InvalidOrder` if the order is already resting or fully filled.
    pub fn place_market_order(&mut self, order: &mut Order) -> Result<Vec<Match>> {
        self.validate_incoming(order)?;
        debug!(order_id = %order.id(), side = %order.side(), size = %order.remaining(), "placing market order");

        let matches = self.match_incoming(order, None);

        if !order.is_filled() {
            debug!(
                order_id = %order.id(),
                unfilled = %order.remaining(),
                "market order exhausted opposite side, remainder discarded"
            );
        }
        Ok(matches)
    }

    /// Cancel a resting order, removing all of its remaining size.
    ///
    /// Returns the removed order.
    ///
    /// # Errors
    ///
    /// `Error::OrderNotFound` if no resting order has this id. Cancelling
    /// twice is safe; the second call reports not found and changes nothing.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Result<Order> {
        let Some(key) = self.order_index.remove(&order_id) else {
            debug!(%order_id, "cancel for unknown order");
            return Err(Error::OrderNotFound(order_id));
        };

        if let Some((side, Some(price))) = self
            .orders
            .get(key)
            .map(|node| (node.order.side(), node.order.resting_price()))
        {
            match side {
                Side::Buy => self.bids.remove(price, key, &mut self.orders),
                Side::Sell => self.asks.remove(price, key, &mut self.orders),
            };
        }

        let node = self.orders.try_remove(key).ok_or(Error::OrderNotFound(order_id))?;
        debug!(%order_id, remaining = %node.remaining(), "order cancelled");
        Ok(node.order)
    }

    // ========================================================================
    // Matching
    // ========================================================================

    fn validate_incoming(&self, order: &Order) -> Result<()> {
        if self.order_index.contains_key(&order.id()) || order.resting_price().is_some() {
            return Err(Error::InvalidOrder(format!("order {} is already resting", order.id())));
        }
        if order.is_filled() {
            return Err(Error::InvalidOrder(format!("order {} has nothing left to fill", order.id())));
        }
        Ok(())
    }

    /// Trade `incoming` against the opposite side until it is filled, the
    /// side runs dry, or the best opposite price falls outside `limit`.
    fn match_incoming(&mut self, incoming: &mut Order, limit: Option<Decimal>) -> Vec<Match> {
        let aggressor = incoming.side();
        let Self {
            orders,
            bids,
            asks,
            order_index,
            next_sequence,
        } = self;
        let opposite = match aggressor {
            Side::Buy => asks,
            Side::Sell => bids,
        };

        let mut matches = Vec::new();

        while !incoming.is_filled() {
            let Some(level) = opposite.best_level() else {
                break;
            };
            let price = level.price();
            if limit.is_some_and(|limit| !aggressor.accepts(limit, price)) {
                break;
            }
            let Some(key) = level.peek_head() else {
                break;
            };
            let Some(resting) = orders.get_mut(key) else {
                break;
            };

            let size = resting.fill(incoming.remaining());
            incoming.fill(size);
            let resting_order_id = resting.order_id();
            let resting_filled = resting.is_filled();
            opposite.reduce_volume(price, size);

            let sequence = *next_sequence;
            *next_sequence += 1;
            trace!(
                sequence,
                %price,
                %size,
                %resting_order_id,
                incoming_order_id = %incoming.id(),
                "fill"
            );
            matches.push(Match {
                sequence,
                price,
                size,
                resting_order_id,
                incoming_order_id: incoming.id(),
                aggressor,
            });

            if resting_filled {
                opposite.remove(price, key, orders);
                order_index.remove(&resting_order_id);
                orders.try_remove(key);
            }
        }

        matches
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn buy(size: Decimal) -> Order {
        Order::new(Side::Buy, size).unwrap()
    }

    fn sell(size: Decimal) -> Order {
        Order::new(Side::Sell, size).unwrap()
    }

    #[test]
    fn test_orderbook_new() {
        let book = Orderbook::new();

        assert!(book.is_empty());
        assert_eq!(book.order_count(), 0);
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
        assert!(book.spread().is_none());
        assert_eq!(book.bid_total_volume(), dec!(0));
        assert_eq!(book.ask_total_volume(), dec!(0));
    }

    #[test]
    fn test_orderbook_with_capacity() {
        let book = Orderbook::with_capacity(10_000);
        assert!(book.capacity() >= 10_000);
    }

    #[test]
    fn test_place_limit_orders_rest() {
        let mut book = Orderbook::new();

        let a = book.place_limit_order(dec!(10000), sell(dec!(10))).unwrap();
        let b = book.place_limit_order(dec!(18000), sell(dec!(5))).unwrap();

        assert!(a.resting && b.resting);
        assert!(a.matches.is_empty());
        assert_eq!(book.asks().level_count(), 2);
        assert_eq!(book.best_ask(), Some(dec!(10000)));
        assert_eq!(book.ask_total_volume(), dec!(15));
        assert_eq!(book.order(a.order_id).and_then(Order::resting_price), Some(dec!(10000)));
    }

    #[test]
    fn test_spread() {
        let mut book = Orderbook::new();

        book.place_limit_order(dec!(9900), buy(dec!(1))).unwrap();
        assert!(book.spread().is_none());

        book.place_limit_order(dec!(10000), sell(dec!(1))).unwrap();
        assert_eq!(book.spread(), Some(dec!(100)));
    }

    #[test]
    fn test_place_limit_rejects_bad_price() {
        let mut book = Orderbook::new();

        assert!(matches!(
            book.place_limit_order(dec!(0), buy(dec!(1))),
            Err(Error::InvalidOrder(_))
        ));
        assert!(matches!(
            book.place_limit_order(dec!(-5), buy(dec!(1))),
            Err(Error::InvalidOrder(_))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn test_place_limit_rejects_resting_duplicate() {
        let mut book = Orderbook::new();
        let order = buy(dec!(3));
        let duplicate = order.clone();

        book.place_limit_order(dec!(100), order).unwrap();

        assert!(matches!(
            book.place_limit_order(dec!(101), duplicate),
            Err(Error::InvalidOrder(_))
        ));
        assert_eq!(book.bid_total_volume(), dec!(3));
        assert_eq!(book.bids().level_count(), 1);
    }

    #[test]
    fn test_place_limit_rejects_out_of_bounds_price() {
        let mut book = Orderbook::new();

        assert!(matches!(
            book.place_limit_order(dec!(100.123456789), buy(dec!(1))),
            Err(Error::InvalidOrder(_))
        ));
        assert!(matches!(
            book.place_limit_order(Decimal::MAX, sell(dec!(1))),
            Err(Error::InvalidOrder(_))
        ));
        assert!(book.is_empty());
        assert!(book.bids().is_empty() && book.asks().is_empty());
    }

    #[test]
    fn test_place_limit_rejects_side_volume_overflow() {
        let mut book = Orderbook::new();
        let max = quantity::max_value();
        let first = book.place_limit_order(dec!(100), buy(max)).unwrap();
        assert!(first.resting);
        let before = book.snapshot();

        assert!(matches!(
            book.place_limit_order(dec!(99), buy(dec!(0.00000001))),
            Err(Error::InvalidOrder(_))
        ));

        // Rejected before any mutation: no stray level, index entry or volume
        assert_eq!(book.snapshot(), before);
        assert_eq!(book.bids().level_count(), 1);
        assert_eq!(book.bids().order_count(), 1);
        assert_eq!(book.order_count(), 1);
        assert_eq!(book.bid_total_volume(), max);
        assert!(book.bids().level(dec!(99)).is_none());

        // The opposite side is unaffected by a full bid side
        let ask = book.place_limit_order(dec!(101), sell(max)).unwrap();
        assert!(ask.resting);
        assert_eq!(book.ask_total_volume(), max);
    }

    #[test]
    fn test_full_side_still_matches_up_to_capacity() {
        let mut book = Orderbook::new();
        let max = quantity::max_value();
        let tick = dec!(0.00000001);
        book.place_limit_order(dec!(100), sell(max - tick)).unwrap();
        book.place_limit_order(dec!(101), sell(tick)).unwrap();
        assert_eq!(book.ask_total_volume(), max);

        let mut taker = buy(max);
        let matches = book.place_market_order(&mut taker).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].size, max - tick);
        assert_eq!(matches[1].size, tick);
        assert!(taker.is_filled());
        assert!(book.is_empty());
        assert_eq!(book.ask_total_volume(), dec!(0));
    }

    #[test]
    fn test_mixed_magnitude_level_volume_stays_exact() {
        let mut book = Orderbook::new();
        let large = book.place_limit_order(dec!(10000), buy(dec!(1000))).unwrap().order_id;
        let small = book.place_limit_order(dec!(10000), buy(dec!(0.12345678))).unwrap().order_id;
        let huge = book
            .place_limit_order(dec!(10000), buy(dec!(999999999999.99999999)))
            .unwrap()
            .order_id;

        book.cancel_order(large).unwrap();
        book.cancel_order(huge).unwrap();

        let level = book.bids().best_level().unwrap();
        assert_eq!(level.volume(), dec!(0.12345678));
        assert_eq!(book.order(small).map(Order::remaining), Some(level.volume()));
        assert_eq!(book.bid_total_volume(), dec!(0.12345678));
    }

    #[test]
    fn test_place_market_order_single_fill() {
        let mut book = Orderbook::new();
        let placement = book.place_limit_order(dec!(10000), sell(dec!(20))).unwrap();

        let mut taker = buy(dec!(10));
        let matches = book.place_market_order(&mut taker).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(book.asks().level_count(), 1);
        assert_eq!(book.ask_total_volume(), dec!(10));
        assert_eq!(matches[0].ask_order_id(), placement.order_id);
        assert_eq!(matches[0].bid_order_id(), taker.id());
        assert_eq!(matches[0].size, dec!(10));
        assert_eq!(matches[0].price, dec!(10000));
        assert!(taker.is_filled());

        // Partially filled maker keeps resting with its reduced size
        assert_eq!(book.order(placement.order_id).map(Order::remaining), Some(dec!(10)));
    }

    #[test]
    fn test_place_market_order_multi_level() {
        let mut book = Orderbook::new();

        let a = book.place_limit_order(dec!(10000), buy(dec!(5))).unwrap().order_id;
        let d = book.place_limit_order(dec!(10000), buy(dec!(1))).unwrap().order_id;
        let b = book.place_limit_order(dec!(9000), buy(dec!(8))).unwrap().order_id;
        let c = book.place_limit_order(dec!(5000), buy(dec!(10))).unwrap().order_id;

        assert_eq!(book.bid_total_volume(), dec!(24));

        let mut taker = sell(dec!(20));
        let matches = book.place_market_order(&mut taker).unwrap();

        let fills: Vec<_> = matches.iter().map(|m| (m.resting_order_id, m.price, m.size)).collect();
        assert_eq!(
            fills,
            vec![
                (a, dec!(10000), dec!(5)),
                (d, dec!(10000), dec!(1)),
                (b, dec!(9000), dec!(8)),
                (c, dec!(5000), dec!(6)),
            ]
        );
        assert!(taker.is_filled());
        assert_eq!(book.bid_total_volume(), dec!(4));
        assert_eq!(book.bids().level_count(), 1);
        assert_eq!(book.order(c).map(Order::remaining), Some(dec!(4)));
        assert!(!book.contains_order(a));
        assert!(!book.contains_order(b));
    }

    #[test]
    fn test_market_order_remainder_discarded() {
        let mut book = Orderbook::new();
        book.place_limit_order(dec!(100), sell(dec!(3))).unwrap();

        let mut taker = buy(dec!(10));
        let matches = book.place_market_order(&mut taker).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(taker.remaining(), dec!(7));
        assert!(book.is_empty());
        assert!(book.bids().is_empty());
    }

    #[test]
    fn test_market_order_on_empty_book() {
        let mut book = Orderbook::new();
        let mut taker = sell(dec!(1));

        assert!(book.place_market_order(&mut taker).unwrap().is_empty());
        assert_eq!(taker.remaining(), dec!(1));
    }

    #[test]
    fn test_market_order_rejects_filled_order() {
        let mut book = Orderbook::new();
        book.place_limit_order(dec!(100), sell(dec!(5))).unwrap();

        let mut taker = buy(dec!(1));
        book.place_market_order(&mut taker).unwrap();

        assert!(matches!(book.place_market_order(&mut taker), Err(Error::InvalidOrder(_))));
        assert_eq!(book.ask_total_volume(), dec!(4));
    }

    #[test]
    fn test_market_order_rejects_clone_of_resting_order() {
        let mut book = Orderbook::new();
        let id = book.place_limit_order(dec!(100), sell(dec!(5))).unwrap().order_id;
        book.place_limit_order(dec!(99), buy(dec!(2))).unwrap();
        let before = book.snapshot();

        let mut clone = book.order(id).cloned().unwrap();

        assert!(matches!(book.place_market_order(&mut clone), Err(Error::InvalidOrder(_))));
        assert_eq!(clone.remaining(), dec!(5));
        assert_eq!(book.snapshot(), before);
        assert_eq!(book.bid_total_volume(), dec!(2));
    }

    #[test]
    fn test_crossing_limit_order_matches_then_rests() {
        let mut book = Orderbook::new();
        book.place_limit_order(dec!(100), sell(dec!(2))).unwrap();
        book.place_limit_order(dec!(101), sell(dec!(2))).unwrap();
        book.place_limit_order(dec!(105), sell(dec!(2))).unwrap();

        let placement = book.place_limit_order(dec!(101), buy(dec!(5))).unwrap();

        assert_eq!(placement.matches.len(), 2);
        assert_eq!(placement.matches[0].price, dec!(100));
        assert_eq!(placement.matches[1].price, dec!(101));
        assert!(placement.resting);
        assert_eq!(placement.remaining, dec!(1));
        assert_eq!(book.best_bid(), Some(dec!(101)));
        assert_eq!(book.best_ask(), Some(dec!(105)));
        assert_eq!(book.bid_total_volume(), dec!(1));
        assert_eq!(book.ask_total_volume(), dec!(2));
    }

    #[test]
    fn test_crossing_limit_order_fully_filled_does_not_rest() {
        let mut book = Orderbook::new();
        book.place_limit_order(dec!(9000), buy(dec!(4))).unwrap();

        let placement = book.place_limit_order(dec!(8500), sell(dec!(4))).unwrap();

        assert_eq!(placement.matches.len(), 1);
        assert_eq!(placement.matches[0].price, dec!(9000));
        assert_eq!(placement.matches[0].aggressor, Side::Sell);
        assert!(!placement.resting);
        assert!(!book.contains_order(placement.order_id));
        assert!(book.is_empty());
    }

    #[test]
    fn test_cancel_order() {
        let mut book = Orderbook::new();
        let id = book.place_limit_order(dec!(10000), buy(dec!(4))).unwrap().order_id;
        assert_eq!(book.bid_total_volume(), dec!(4));

        let cancelled = book.cancel_order(id).unwrap();

        assert_eq!(cancelled.id(), id);
        assert!(cancelled.resting_price().is_none());
        assert_eq!(book.bid_total_volume(), dec!(0));
        assert!(book.best_bid().is_none());
        assert!(matches!(book.cancel_order(id), Err(Error::OrderNotFound(missing)) if missing == id));
    }

    #[test]
    fn test_cancel_keeps_other_orders_at_level() {
        let mut book = Orderbook::new();
        let a = book.place_limit_order(dec!(100), sell(dec!(1))).unwrap().order_id;
        let b = book.place_limit_order(dec!(100), sell(dec!(2))).unwrap().order_id;
        let c = book.place_limit_order(dec!(100), sell(dec!(3))).unwrap().order_id;

        book.cancel_order(b).unwrap();

        let level = book.asks().best_level().unwrap();
        assert_eq!(level.len(), 2);
        assert_eq!(level.volume(), dec!(4));

        // FIFO among survivors is unchanged
        let mut taker = buy(dec!(2));
        let matches = book.place_market_order(&mut taker).unwrap();
        assert_eq!(matches[0].resting_order_id, a);
        assert_eq!(matches[1].resting_order_id, c);
    }

    #[test]
    fn test_match_sequence_increases() {
        let mut book = Orderbook::new();
        book.place_limit_order(dec!(100), sell(dec!(1))).unwrap();
        book.place_limit_order(dec!(100), sell(dec!(1))).unwrap();

        let mut first = buy(dec!(1));
        let mut second = buy(dec!(1));
        let a = book.place_market_order(&mut first).unwrap();
        let b = book.place_market_order(&mut second).unwrap();

        assert!(b[0].sequence > a[0].sequence);
    }
}

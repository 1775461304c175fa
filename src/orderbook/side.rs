//! One side (bids or asks) of the order book.
//!
//! ## Structure
//!
//! - **HashMap**: exact price to `PriceLevel`, for O(1) existence checks
//! - **BTreeSet**: the same prices kept sorted, for best-price access
//!
//! The side decides which end of the ordering is "best": the highest price
//! for bids, the lowest for asks. Every indexed price has a non-empty level;
//! a level is dropped from both structures as soon as its last order leaves.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use slab::Slab;

use crate::orderbook::{OrderNode, PriceLevel};
use crate::types::Side;

/// An ordered collection of price levels for one side of the book.
#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    levels: HashMap<Decimal, PriceLevel>,
    prices: BTreeSet<Decimal>,
    /// Cached sum of all level volumes
    total_volume: Decimal,
    order_count: usize,
}

impl BookSide {
    /// Create an empty side.
    ///
    /// # Arguments
    ///
    /// * `side` - Which orders this side holds; picks the best-price end
    ///
    /// # Example
    ///
    /// ```
    /// use limit_book::orderbook::BookSide;
    /// use limit_book::types::Side;
    /// use rust_decimal::Decimal;
    ///
    /// let bids = BookSide::new(Side::Buy);
    /// assert!(bids.is_empty());
    /// assert_eq!(bids.total_volume(), Decimal::ZERO);
    /// ```
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: HashMap::new(),
            prices: BTreeSet::new(),
            total_volume: Decimal::ZERO,
            order_count: 0,
        }
    }

    /// Side of the orders held here
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Sum of aggregate volumes across all levels
    #[inline]
    pub fn total_volume(&self) -> Decimal {
        self.total_volume
    }

    /// Number of resting orders on this side
    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    /// Number of distinct price levels
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// True if no price level is indexed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at exactly `price`, if one exists
    pub fn level(&self, price: Decimal) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Highest-priority price, or None if the side is empty
    pub fn best_price(&self) -> Option<Decimal> {
        match self.side {
            Side::Buy => self.prices.last().copied(),
            Side::Sell => self.prices.first().copied(),
        }
    }

    /// Highest-priority level, or None if the side is empty
    pub fn best_level(&self) -> Option<&PriceLevel> {
        self.best_price().and_then(|price| self.levels.get(&price))
    }

    /// Iterate levels best price first
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        let (ascending, descending) = match self.side {
            Side::Buy => (None, Some(self.prices.iter().rev())),
            Side::Sell => (Some(self.prices.iter()), None),
        };
        ascending
            .into_iter()
            .flatten()
            .chain(descending.into_iter().flatten())
            .filter_map(|price| self.levels.get(price))
    }

    /// Existing level at `price`, or a newly created and indexed empty one.
    ///
    /// Callers must put an order into a newly created level before the side
    /// is observed again.
    pub fn get_or_create_level(&mut self, price: Decimal) -> &mut PriceLevel {
        let prices = &mut self.prices;
        self.levels.entry(price).or_insert_with(|| {
            prices.insert(price);
            PriceLevel::new(price)
        })
    }

    /// Drop the level at `price` from the index and ordering if it is empty.
    ///
    /// Returns true if a level was removed.
    pub fn remove_level_if_empty(&mut self, price: Decimal) -> bool {
        match self.levels.get(&price) {
            Some(level) if level.is_empty() => {
                self.levels.remove(&price);
                self.prices.remove(&price);
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Bookkeeping used by the order book
    // ========================================================================

    /// Rest the order at `key` on the level at `price`
    pub(crate) fn insert(&mut self, price: Decimal, key: usize, slab: &mut Slab<OrderNode>) {
        let Some(quantity) = slab.get(key).map(OrderNode::remaining) else {
            return;
        };
        self.get_or_create_level(price).push_back(key, slab);
        self.total_volume += quantity;
        self.order_count += 1;
    }

    /// Unlink the order at `key` from the level at `price`, dropping the level
    /// if it became empty. Returns the removed remaining size.
    pub(crate) fn remove(
        &mut self,
        price: Decimal,
        key: usize,
        slab: &mut Slab<OrderNode>,
    ) -> Option<Decimal> {
        let quantity = self.levels.get_mut(&price)?.remove(key, slab)?;
        self.total_volume -= quantity;
        self.order_count -= 1;
        self.remove_level_if_empty(price);
        Some(quantity)
    }

    /// Record a partial fill of `filled` against a member of the level at `price`
    pub(crate) fn reduce_volume(&mut self, price: Decimal, filled: Decimal) {
        if let Some(level) = self.levels.get_mut(&price) {
            level.reduce_volume(filled);
            self.total_volume -= filled;
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `PriceLevel` holds all orders resting at one exact price as a FIFO
//! queue (doubly-linked list through the slab).
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Matching consumes orders from the head
//! - Any order can be removed in O(1) using the slab key, and the relative
//!   order of the remaining members is preserved
//!
//! The level's aggregate volume is maintained incrementally and always
//! equals the sum of its members' remaining sizes. Sizes are bounded by
//! [`crate::types::quantity`], so this arithmetic never rounds or overflows.

use rust_decimal::Decimal;
use slab::Slab;

use crate::orderbook::OrderNode;

/// A price level containing orders at a single price.
///
/// The order data lives in the slab; this struct only holds the queue
/// metadata and the aggregate volume.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Decimal,
    volume: Decimal,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            volume: Decimal::ZERO,
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Exact price shared by every member
    #[inline]
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Sum of remaining sizes of all member orders
    #[inline]
    pub fn volume(&self) -> Decimal {
        self.volume
    }

    /// Number of resting orders
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True once the last member has left
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slab key of the oldest member (next to be matched)
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Append an order to the tail of the queue.
    ///
    /// Links the order's back-reference to this level and adds its
    /// remaining size to the aggregate volume. A key missing from the slab
    /// is ignored.
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let Some(node) = slab.get_mut(key) else {
            return;
        };
        node.prev = self.tail;
        node.next = None;
        node.order.link_level(self.price);
        let quantity = node.remaining();

        match self.tail.and_then(|tail| slab.get_mut(tail)) {
            Some(tail_node) => tail_node.next = Some(key),
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.len += 1;
        self.volume += quantity;
    }

    /// Remove an order from the queue by slab key.
    ///
    /// Clears the order's back-reference and subtracts its remaining size at
    /// the time of removal. Returns that size, or `None` (and does nothing)
    /// if the key is not a member of this level.
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> Option<Decimal> {
        let node = slab.get(key)?;
        if node.order.resting_price() != Some(self.price) {
            return None;
        }
        let is_member = node.prev.is_some() || node.next.is_some() || self.head == Some(key);
        if !is_member {
            return None;
        }
        let (prev_key, next_key, quantity) = (node.prev, node.next, node.remaining());

        match prev_key.and_then(|prev| slab.get_mut(prev)) {
            Some(prev_node) => prev_node.next = next_key,
            None => self.head = next_key,
        }
        match next_key.and_then(|next| slab.get_mut(next)) {
            Some(next_node) => next_node.prev = prev_key,
            None => self.tail = prev_key,
        }

        if let Some(node) = slab.get_mut(key) {
            node.prev = None;
            node.next = None;
            node.order.unlink_level();
        }

        self.len -= 1;
        self.volume -= quantity;

        Some(quantity)
    }

    /// Reduce the aggregate volume after a member was partially filled
    pub fn reduce_volume(&mut self, filled: Decimal) {
        self.volume -= filled;
    }

    /// Iterate member slab keys from head (oldest) to tail (newest)
    pub fn order_keys<'a>(&self, slab: &'a Slab<OrderNode>) -> impl Iterator<Item = usize> + 'a {
        std::iter::successors(self.head, move |key| slab.get(*key).and_then(|node| node.next))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

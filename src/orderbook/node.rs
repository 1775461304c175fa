//! Order node for slab-based storage.
//!
//! ## Design
//!
//! `OrderNode` wraps a resting `Order` with doubly-linked list pointers so a
//! price level can unlink any member in O(1) given its slab key.
//!
//! ## Linked List
//!
//! Orders at the same price level form a doubly-linked list:
//! - `next`: the next (newer) order in the level
//! - `prev`: the previous (older) order in the level

use rust_decimal::Decimal;

use crate::types::{Order, OrderId};

/// Order node stored in the slab.
///
/// The pointers are slab keys (`usize`), not references.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The resting order
    pub order: Order,

    /// Next order in the level queue (None at the tail)
    pub next: Option<usize>,

    /// Previous order in the level queue (None at the head)
    pub prev: Option<usize>,
}

impl OrderNode {
    /// Create a new, unlinked order node
    #[inline]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            next: None,
            prev: None,
        }
    }

    /// Check if this node has no queue neighbours
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    /// Id of the wrapped order
    #[inline]
    pub fn order_id(&self) -> OrderId {
        self.order.id()
    }

    /// Remaining size of the wrapped order
    #[inline]
    pub fn remaining(&self) -> Decimal {
        self.order.remaining()
    }

    /// Fill a portion of this order, returning the quantity actually filled
    #[inline]
    pub fn fill(&mut self, quantity: Decimal) -> Decimal {
        self.order.fill(quantity)
    }

    /// Check if the wrapped order is fully filled
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.order.is_filled()
    }
}

//! Point-in-time copy of the book.
//!
//! ## State Root
//!
//! The 32-byte state root is a SHA-256 hash over a canonical encoding of
//! both sides: side tag, normalized level price, then each order's side and
//! normalized remaining size in queue order. Order ids and timestamps are
//! process-scoped and stay out of the hash, so two books fed the same
//! sequence of requests hash identically, independent of decimal scale.

use rust_decimal::Decimal;
use serde::Serialize;
use sha2::{Digest, Sha256};
use slab::Slab;

use crate::orderbook::{BookSide, OrderNode};
use crate::types::Order;

/// One price level in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSnapshot {
    pub price: Decimal,
    /// Aggregate remaining size at this price
    pub volume: Decimal,
    /// Member orders, oldest first
    pub orders: Vec<Order>,
}

/// Both sides of the book, best price first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSnapshot {
    pub bids: Vec<LevelSnapshot>,
    pub asks: Vec<LevelSnapshot>,
    pub bid_total_volume: Decimal,
    pub ask_total_volume: Decimal,
}

impl BookSnapshot {
    pub(crate) fn capture(bids: &BookSide, asks: &BookSide, slab: &Slab<OrderNode>) -> Self {
        Self {
            bids: capture_side(bids, slab),
            asks: capture_side(asks, slab),
            bid_total_volume: bids.total_volume(),
            ask_total_volume: asks.total_volume(),
        }
    }

    /// Total resting orders across both sides
    pub fn order_count(&self) -> usize {
        self.bids
            .iter()
            .chain(&self.asks)
            .map(|level| level.orders.len())
            .sum()
    }

    /// SHA-256 over the canonical encoding of the book
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for (tag, levels) in [(0u8, &self.bids), (1u8, &self.asks)] {
            hasher.update([tag]);
            hasher.update((levels.len() as u64).to_le_bytes());
            for level in levels {
                hasher.update(level.price.normalize().serialize());
                hasher.update((level.orders.len() as u64).to_le_bytes());
                for order in &level.orders {
                    hasher.update([order.side().to_u8()]);
                    hasher.update(order.remaining().normalize().serialize());
                }
            }
        }
        let result = hasher.finalize();

        let mut root = [0u8; 32];
        root.copy_from_slice(&result);
        root
    }

    /// State root as a lowercase hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}

fn capture_side(side: &BookSide, slab: &Slab<OrderNode>) -> Vec<LevelSnapshot> {
    side.levels()
        .map(|level| LevelSnapshot {
            price: level.price(),
            volume: level.volume(),
            orders: level
                .order_keys(slab)
                .filter_map(|key| slab.get(key))
                .map(|node| node.order.clone())
                .collect(),
        })
        .collect()
}

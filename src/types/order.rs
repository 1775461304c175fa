//! Order types for the limit order book.
//!
//! An [`Order`] is created by the caller, then handed to the book. Its
//! remaining size is only ever decremented by matching, which keeps the
//! per-level aggregate volume in step with its members.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::types::quantity;

/// Next identifier handed out by [`Order::new`]
static NEXT_ORDER_ID: AtomicU64 = AtomicU64::new(1);

/// Monotonic epoch for order timestamps
static CLOCK_EPOCH: OnceLock<Instant> = OnceLock::new();

fn monotonic_nanos() -> u64 {
    let epoch = CLOCK_EPOCH.get_or_init(Instant::now);
    u64::try_from(epoch.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

// ============================================================================
// OrderId
// ============================================================================

/// Unique order identifier.
///
/// Issued from a process-wide counter, so ids never collide within the
/// lifetime of any book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl OrderId {
    fn next() -> Self {
        OrderId(NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Side
// ============================================================================

/// Order side: Buy (bid) or Sell (ask)
///
/// The side also carries the price-priority rules, so matching is written
/// once and parameterized by direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid) - best price is the highest
    Buy,
    /// Sell order (ask) - best price is the lowest
    Sell,
}

impl Side {
    /// Convert to u8 for canonical encoding
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Whether price `a` has strictly higher priority than `b` on this side.
    ///
    /// ```
    /// use limit_book::types::Side;
    /// use rust_decimal::Decimal;
    ///
    /// assert!(Side::Buy.is_better(Decimal::from(101), Decimal::from(100)));
    /// assert!(Side::Sell.is_better(Decimal::from(99), Decimal::from(100)));
    /// ```
    #[inline]
    pub fn is_better(self, a: Decimal, b: Decimal) -> bool {
        match self {
            Side::Buy => a > b,
            Side::Sell => a < b,
        }
    }

    /// Whether an order on this side with `limit` may trade against
    /// opposite-side liquidity resting at `resting_price`.
    ///
    /// A bid accepts any ask at or below its limit; an ask accepts any bid
    /// at or above its limit.
    #[inline]
    pub fn accepts(self, limit: Decimal, resting_price: Decimal) -> bool {
        !self.is_better(resting_price, limit)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

// ============================================================================
// Order
// ============================================================================

/// A single order intent.
///
/// ## Example
///
/// ```
/// use limit_book::types::{Order, Side};
/// use rust_decimal::Decimal;
///
/// let order = Order::new(Side::Buy, Decimal::from(5)).unwrap();
/// assert_eq!(order.remaining(), Decimal::from(5));
/// assert!(!order.is_filled());
/// assert!(order.resting_price().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: OrderId,
    side: Side,
    /// Size at creation
    size: Decimal,
    /// Size still open; decremented only by matching
    remaining: Decimal,
    /// Nanoseconds since the process-local monotonic epoch
    timestamp: u64,
    /// Price of the level this order rests at (non-owning back-reference)
    #[serde(skip)]
    level: Option<Decimal>,
}

impl Order {
    /// Create a new order with a fresh id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOrder` if `size` is zero or negative, has more
    /// than [`quantity::MAX_SCALE`] decimal places, or exceeds
    /// [`quantity::MAX_VALUE`].
    pub fn new(side: Side, size: Decimal) -> Result<Self> {
        quantity::validate("size", size)?;

        Ok(Self {
            id: OrderId::next(),
            side,
            size,
            remaining: size,
            timestamp: monotonic_nanos(),
            level: None,
        })
    }

    /// Identifier issued at creation
    #[inline]
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Buy or sell
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Original size at creation
    #[inline]
    pub fn size(&self) -> Decimal {
        self.size
    }

    /// Size still open
    #[inline]
    pub fn remaining(&self) -> Decimal {
        self.remaining
    }

    /// Size already filled
    #[inline]
    pub fn filled(&self) -> Decimal {
        self.size - self.remaining
    }

    /// Filled fraction in `[0, 1]`
    pub fn fill_ratio(&self) -> Decimal {
        self.filled() / self.size
    }

    /// Check if the order is fully filled
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Creation time used for FIFO tie-breaks
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Price of the level this order currently rests at, if any
    #[inline]
    pub fn resting_price(&self) -> Option<Decimal> {
        self.level
    }

    /// Fill a portion of this order.
    ///
    /// Returns the quantity actually filled, capped at the remaining size.
    pub(crate) fn fill(&mut self, quantity: Decimal) -> Decimal {
        let filled = quantity.min(self.remaining);
        self.remaining -= filled;
        filled
    }

    pub(crate) fn link_level(&mut self, price: Decimal) {
        self.level = Some(price);
    }

    pub(crate) fn unlink_level(&mut self) {
        self.level = None;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

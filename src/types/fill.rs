//! Match type representing a fill between a resting order and an aggressor.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{OrderId, Side};

/// A single fill produced by matching.
///
/// ## Terminology
///
/// - **Resting**: the order that was already on the book (maker)
/// - **Incoming**: the aggressor that triggered the match (taker)
///
/// The fill always executes at the resting level's price. The book never
/// settles a match; callers map matches to whatever settlement they run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Per-book match sequence number
    pub sequence: u64,

    /// Price of the resting level
    pub price: Decimal,

    /// Filled size
    pub size: Decimal,

    /// The resting order that was hit
    pub resting_order_id: OrderId,

    /// The incoming order that triggered the match
    pub incoming_order_id: OrderId,

    /// Side of the incoming order
    pub aggressor: Side,
}

impl Match {
    /// Id of the buy-side order in this match
    pub fn bid_order_id(&self) -> OrderId {
        match self.aggressor {
            Side::Buy => self.incoming_order_id,
            Side::Sell => self.resting_order_id,
        }
    }

    /// Id of the sell-side order in this match
    pub fn ask_order_id(&self) -> OrderId {
        match self.aggressor {
            Side::Buy => self.resting_order_id,
            Side::Sell => self.incoming_order_id,
        }
    }

    /// Price times size, or `None` if the product overflows `Decimal`
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(aggressor: Side) -> Match {
        Match {
            sequence: 1,
            price: dec!(10000),
            size: dec!(2.5),
            resting_order_id: OrderId(10),
            incoming_order_id: OrderId(20),
            aggressor,
        }
    }

    #[test]
    fn test_match_bid_ask_ids() {
        let buy_taker = sample(Side::Buy);
        assert_eq!(buy_taker.bid_order_id(), OrderId(20));
        assert_eq!(buy_taker.ask_order_id(), OrderId(10));

        let sell_taker = sample(Side::Sell);
        assert_eq!(sell_taker.bid_order_id(), OrderId(10));
        assert_eq!(sell_taker.ask_order_id(), OrderId(20));
    }

    #[test]
    fn test_match_notional() {
        assert_eq!(sample(Side::Buy).notional(), Some(dec!(25000)));
    }

    #[test]
    fn test_match_notional_overflow() {
        let mut large = sample(Side::Sell);
        large.price = dec!(1000000000000000000);
        large.size = dec!(1000000000000000000);

        assert_eq!(large.notional(), None);
    }
}

//! Order book for a single market.
//!
//! ## Architecture
//!
//! - **Slab-based storage**: O(1) order insertion, removal, and lookup
//! - **Price levels**: FIFO queues of orders sharing one exact price
//! - **Book sides**: hashed price index plus sorted price set per side
//!
//! ## Components
//!
//! - [`OrderNode`]: Wrapper around `Order` with queue pointers
//! - [`PriceLevel`]: Orders at a single price with aggregate volume
//! - [`BookSide`]: All levels of one side, best price first
//! - [`Orderbook`]: Both sides, the order index, and matching
//! - [`BookSnapshot`]: Serializable copy of the book with a state root
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Rest order | O(log n) new level, O(1) existing level |
//! | Cancel order by ID | O(1) + O(log n) if the level empties |
//! | Best bid/ask | O(log n) |
//! | Total volume | O(1) |
//! | Match | O(k log n) for k fills |
//!
//! ## Example
//!
//! ```
//! use limit_book::orderbook::Orderbook;
//! use limit_book::types::{Order, Side};
//! use rust_decimal::Decimal;
//!
//! let mut book = Orderbook::new();
//! let order = Order::new(Side::Buy, Decimal::from(5)).unwrap();
//! book.place_limit_order(Decimal::from(10_000), order).unwrap();
//!
//! assert_eq!(book.best_bid(), Some(Decimal::from(10_000)));
//! assert_eq!(book.bid_total_volume(), Decimal::from(5));
//! ```

pub mod node;
pub mod level;
pub mod side;
pub mod book;
pub mod snapshot;

pub use node::OrderNode;
pub use level::PriceLevel;
pub use side::BookSide;
pub use book::{LimitPlacement, Orderbook};
pub use snapshot::{BookSnapshot, LevelSnapshot};

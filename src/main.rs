//! Limit Book - demo binary
//!
//! Builds the default exchange, rests a ladder of bids on ETH, then sweeps
//! it with a market sell and logs what happened.
//!
//! ```bash
//! RUST_LOG=limit_book=debug cargo run
//! ```

use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use limit_book::config::ExchangeConfig;
use limit_book::{Exchange, Order, Side};

const MARKET: &str = "ETH";

fn main() -> limit_book::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let exchange = Exchange::from_config(&ExchangeConfig::default());

    for (price, size) in [(10_000, 5), (10_000, 1), (9_000, 8), (5_000, 10)] {
        let order = Order::new(Side::Buy, Decimal::from(size))?;
        let placement = exchange.place_limit_order(MARKET, Decimal::from(price), order)?;
        info!(order_id = %placement.order_id, price, size, "bid placed");
    }
    info!(volume = %exchange.bid_total_volume(MARKET)?, "bid side loaded");

    let mut sell = Order::new(Side::Sell, Decimal::from(20))?;
    let matches = exchange.place_market_order(MARKET, &mut sell)?;
    for m in &matches {
        info!(
            price = %m.price,
            size = %m.size,
            bid = %m.bid_order_id(),
            ask = %m.ask_order_id(),
            "matched"
        );
    }

    let snapshot = exchange.snapshot(MARKET)?;
    let best_bid = exchange.best_bid(MARKET)?;
    info!(
        matches = matches.len(),
        bid_volume = %snapshot.bid_total_volume,
        ask_volume = %snapshot.ask_total_volume,
        best_bid = ?best_bid,
        state_root = %snapshot.state_root_hex(),
        "market sell complete"
    );

    Ok(())
}

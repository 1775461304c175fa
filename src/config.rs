//! Configuration for books and the market registry.
//!
//! ```
//! use limit_book::config::ExchangeConfig;
//!
//! let config = ExchangeConfig::from_json_str(r#"{ "markets": ["ETH", "BTC"] }"#).unwrap();
//! assert_eq!(config.markets, vec!["ETH", "BTC"]);
//! assert_eq!(config.book.order_capacity, 1024);
//! ```

use serde::Deserialize;

use crate::error::Result;

/// Default number of pre-allocated order slots per book
pub const DEFAULT_ORDER_CAPACITY: usize = 1024;

/// Settings applied to every order book
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Resting orders to pre-allocate storage for
    pub order_capacity: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            order_capacity: DEFAULT_ORDER_CAPACITY,
        }
    }
}

/// Markets to register at startup and their book settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub markets: Vec<String>,
    pub book: BookConfig,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            markets: vec!["ETH".to_string()],
            book: BookConfig::default(),
        }
    }
}

impl ExchangeConfig {
    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the document is not valid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

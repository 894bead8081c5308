//! # Storage Layer
//!
//! Configuration, the `.prices` text format and the SQLite price catalog.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Config | TOML | `--config` or `<config dir>/config.toml` |
//! | Catalog | SQLite | `<data dir>/prices.db` |
//! | Import data | `.prices` text | `<data dir>/import.prices` or any path |
//!
//! ## Key Types
//!
//! - [`Config`] - Tool configuration
//! - [`TradeDb`] - The price catalog
//! - [`PriceRecord`] - One parsed `.prices` row

mod config;
mod db;
mod prices;

pub use config::{Config, ConfigError, PluginConfig};
pub use db::{DbError, StoredPrice, TradeDb};
pub use prices::{parse_prices, read_prices_file, PriceRecord, PricesError};

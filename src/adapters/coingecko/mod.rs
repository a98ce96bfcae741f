//! CoinGecko Adapter
//!
//! Markets listing client implementing `MarketDataSource`.
//! Free public API, no authentication.

mod client;

pub use client::{CoinGeckoClient, CoinGeckoConfig};

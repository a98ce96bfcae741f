//! Adapters Layer - External System Implementations
//!
//! - CoinGecko: markets listing client implementing `MarketDataSource`
//! - Persistence: heatmap JSON artifacts on disk
//! - CLI: Command-line interface handlers

pub mod coingecko;
pub mod persistence;
pub mod cli;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig};
pub use persistence::{HeatmapWriter, OutputPaths, PersistError};
pub use cli::CliApp;

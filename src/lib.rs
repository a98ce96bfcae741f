//! Crypto Heatmap - hourly top-100 market snapshot
//!
//! Fetches the top coins by market cap from CoinGecko, drops stablecoins,
//! normalizes a fixed field set and writes two JSON artifacts for a static
//! heatmap page.
//!
//! # Modules
//!
//! - `domain`: Core types and logic (coin records, stablecoin set, ranking, output bundle)
//! - `ports`: Trait abstractions (MarketDataSource)
//! - `adapters`: External implementations (CoinGecko, filesystem, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: The fetch → filter → normalize → rank → persist pipeline

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;

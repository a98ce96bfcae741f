//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, the pipeline only sees the
//! `MarketDataSource` trait; the HTTP client lives in the adapters layer.
//! `mocks` provides an in-memory source for tests.

pub mod market_data;
pub mod mocks;

pub use market_data::{MarketDataError, MarketDataSource, PageRequest};
pub use mocks::MockMarketData;

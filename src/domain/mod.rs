//! Domain Layer - Core logic for the crypto heatmap snapshot
//!
//! Pure types and transformations with no I/O. All external interactions
//! happen through the ports layer.
//!
//! - `coin`: raw provider records and their normalized projection
//! - `stablecoins`: identifier set excluded from the heatmap
//! - `ranking`: market cap ordering and top-N truncation
//! - `bundle`: ranked coins plus run metadata

pub mod coin;
pub mod stablecoins;
pub mod ranking;
pub mod bundle;

pub use coin::{NormalizedCoinRecord, RawMarketRecord, round2, UNRANKED};
pub use stablecoins::{StablecoinSet, KNOWN_STABLECOINS};
pub use ranking::{rank_by_market_cap, DEFAULT_TOP_N};
pub use bundle::{format_timestamp, HeatmapMeta, OutputBundle};

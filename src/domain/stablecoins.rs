//! Stablecoin Exclusion Set
//!
//! Fiat-pegged assets carry no meaningful price movement for the heatmap, so
//! they are dropped before normalization. Matching is on the provider's coin
//! identifier, never on the ticker symbol.

use std::collections::HashSet;

use super::coin::RawMarketRecord;

/// Known stablecoin identifiers on the markets provider
pub const KNOWN_STABLECOINS: &[&str] = &[
    "tether",
    "usd-coin",
    "dai",
    "trueusd",
    "first-digital-usd",
    "ethena-usde",
    "usds",
    "paypal-usd",
    "frax",
    "binance-peg-busd",
    "tether-eurt",
    "gemini-dollar",
    "paxos-standard",
    "celo-dollar",
    "binance-usd",
    "terrausd",
    "magic-internet-money",
    "liquity-usd",
    "usdd",
    "tusd",
];

/// Immutable set of identifiers excluded from the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StablecoinSet {
    ids: HashSet<String>,
}

impl StablecoinSet {
    /// Built-in set plus any extra identifiers
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        set.ids.extend(
            extra
                .into_iter()
                .map(Into::into)
                .map(|id: String| id.trim().to_lowercase())
                .filter(|id| !id.is_empty()),
        );
        set
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// True when the record must be dropped
    pub fn excludes(&self, record: &RawMarketRecord) -> bool {
        self.contains(record.id())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for StablecoinSet {
    fn default() -> Self {
        Self {
            ids: KNOWN_STABLECOINS.iter().map(|id| id.to_string()).collect(),
        }
    }
}

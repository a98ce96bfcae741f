//! Output Bundle
//!
//! The ranked coin list plus run metadata. Serialized twice: as the bare
//! array and wrapped in [`HeatmapMeta`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::coin::NormalizedCoinRecord;

/// Ranked coins and the moment the run completed
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBundle {
    pub coins: Vec<NormalizedCoinRecord>,
    pub updated_at: DateTime<Utc>,
}

/// Metadata-wrapped artifact layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapMeta {
    /// ISO-8601 UTC timestamp, e.g. `2024-05-01T12:00:03.123456+00:00`
    pub updated_at: String,
    pub total_coins: usize,
    pub coins: Vec<NormalizedCoinRecord>,
}

impl OutputBundle {
    pub fn new(coins: Vec<NormalizedCoinRecord>, updated_at: DateTime<Utc>) -> Self {
        Self { coins, updated_at }
    }

    /// Stamp the bundle with the current time
    pub fn now(coins: Vec<NormalizedCoinRecord>) -> Self {
        Self::new(coins, Utc::now())
    }

    pub fn total_coins(&self) -> usize {
        self.coins.len()
    }

    pub fn updated_at_iso(&self) -> String {
        format_timestamp(&self.updated_at)
    }

    /// Uppercased symbols of the first `n` coins
    pub fn top_symbols(&self, n: usize) -> Vec<String> {
        self.coins
            .iter()
            .take(n)
            .map(|c| c.symbol.to_uppercase())
            .collect()
    }

    pub fn to_meta(&self) -> HeatmapMeta {
        HeatmapMeta {
            updated_at: self.updated_at_iso(),
            total_coins: self.total_coins(),
            coins: self.coins.clone(),
        }
    }
}

impl HeatmapMeta {
    /// Parsed `updated_at`, if it is valid RFC 3339
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.updated_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Whether `total_coins` agrees with the list it describes
    pub fn is_consistent(&self) -> bool {
        self.total_coins == self.coins.len()
    }
}

/// Microsecond precision with an explicit `+00:00` offset
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

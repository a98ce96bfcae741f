//! Coin Records
//!
//! Raw provider records as decoded from the markets listing, and the reduced
//! projection written to the heatmap artifacts.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Rank assigned to coins the provider did not rank
pub const UNRANKED: u32 = 999;

/// One asset as returned by the markets endpoint.
///
/// The provider is treated as best-effort: every field may be absent or
/// `null`, so everything is optional here and defaulting happens in
/// [`NormalizedCoinRecord::from_raw`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMarketRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_30d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_30d_in_currency: Option<f64>,
    #[serde(default)]
    pub ath: Option<f64>,
    #[serde(default)]
    pub ath_change_percentage: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
}

impl RawMarketRecord {
    /// Provider identifier, empty when missing
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

/// Reduced, defaulted and rounded coin record.
///
/// Every numeric field carries a concrete value except `max_supply`, where
/// `None` (serialized as `null`) means the asset has no supply cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCoinRecord {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub market_cap_rank: u32,
    pub total_volume: f64,
    pub price_change_percentage_24h: f64,
    pub price_change_percentage_7d: f64,
    pub price_change_percentage_30d: f64,
    pub ath: f64,
    pub ath_change_percentage: f64,
    pub circulating_supply: f64,
    pub max_supply: Option<f64>,
}

impl NormalizedCoinRecord {
    /// Project a raw record onto the output schema. Never fails.
    pub fn from_raw(raw: &RawMarketRecord) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let num = |v: Option<f64>| v.unwrap_or(0.0);

        // The currency-qualified variant wins whenever the provider sent one
        let change_7d = raw
            .price_change_percentage_7d_in_currency
            .or(raw.price_change_percentage_7d);
        let change_30d = raw
            .price_change_percentage_30d_in_currency
            .or(raw.price_change_percentage_30d);

        Self {
            id: text(&raw.id),
            symbol: text(&raw.symbol),
            name: text(&raw.name),
            image: text(&raw.image),
            current_price: num(raw.current_price),
            market_cap: num(raw.market_cap),
            market_cap_rank: raw.market_cap_rank.unwrap_or(UNRANKED),
            total_volume: num(raw.total_volume),
            price_change_percentage_24h: round2(num(raw.price_change_percentage_24h)),
            price_change_percentage_7d: round2(num(change_7d)),
            price_change_percentage_30d: round2(num(change_30d)),
            ath: num(raw.ath),
            ath_change_percentage: round2(num(raw.ath_change_percentage)),
            circulating_supply: num(raw.circulating_supply),
            max_supply: raw.max_supply,
        }
    }

    /// Whether the asset reports a hard supply cap
    pub fn has_supply_cap(&self) -> bool {
        self.max_supply.is_some()
    }
}

impl From<&RawMarketRecord> for NormalizedCoinRecord {
    fn from(raw: &RawMarketRecord) -> Self {
        Self::from_raw(raw)
    }
}

/// Round to two decimal places, ties to even.
///
/// Works on the exact binary value, so `2.675` (stored as 2.67499...) gives
/// 2.67 while an exact tie such as `0.125` gives 0.12.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

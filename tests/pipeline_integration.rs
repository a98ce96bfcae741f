//! Heatmap Pipeline Integration Tests
//!
//! End-to-end runs of the pipeline against the in-memory market data source:
//! 1. Pagination, stablecoin exclusion and top-100 truncation
//! 2. Artifact layout and round-trip between the two files
//! 3. Failure behaviour when a page request errors
//! 4. Inter-page pacing
//!
//! All tests are deterministic (no real network calls) and use mock data.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crypto_heatmap::adapters::persistence::{load_meta, OutputPaths};
use crypto_heatmap::application::{HeatmapPipeline, PipelineConfig, PipelineError};
use crypto_heatmap::domain::{NormalizedCoinRecord, RawMarketRecord, StablecoinSet};
use crypto_heatmap::ports::{MarketDataError, MockMarketData, PageRequest};
use tempfile::tempdir;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Create a raw record the way the provider returns it
fn create_raw_coin(index: usize, market_cap: f64) -> RawMarketRecord {
    RawMarketRecord {
        id: Some(format!("coin-{index}")),
        symbol: Some(format!("c{index}")),
        name: Some(format!("Coin {index}")),
        image: Some(format!("https://example.com/{index}.png")),
        current_price: Some(1.0 + index as f64),
        market_cap: Some(market_cap),
        market_cap_rank: Some(index as u32 + 1),
        total_volume: Some(market_cap / 10.0),
        price_change_percentage_24h: Some(1.23456 * index as f64),
        price_change_percentage_7d: Some(-0.5),
        price_change_percentage_30d: None,
        price_change_percentage_7d_in_currency: Some(3.14159),
        price_change_percentage_30d_in_currency: Some(-12.3456),
        ath: Some(100.0),
        ath_change_percentage: Some(-45.6789),
        circulating_supply: Some(1_000_000.0),
        max_supply: if index % 2 == 0 { Some(21_000_000.0) } else { None },
    }
}

fn create_tether() -> RawMarketRecord {
    RawMarketRecord {
        id: Some("tether".to_string()),
        symbol: Some("usdt".to_string()),
        name: Some("Tether".to_string()),
        current_price: Some(1.0),
        market_cap: Some(1.0e13),
        market_cap_rank: Some(3),
        ..Default::default()
    }
}

/// Two pages of 125: one tether and 124 coins each, strictly decreasing caps
fn create_two_page_mock() -> MockMarketData {
    let cap = |i: usize| (10_000 - i) as f64 * 1.0e6;

    let mut page1: Vec<_> = (0..124).map(|i| create_raw_coin(i, cap(i))).collect();
    page1.insert(2, create_tether());
    let mut page2: Vec<_> = (124..248).map(|i| create_raw_coin(i, cap(i))).collect();
    page2.insert(50, create_tether());

    MockMarketData::new().with_page(1, page1).with_page(2, page2)
}

fn create_config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        page_delay: Duration::ZERO,
        output: OutputPaths::new(dir),
        ..Default::default()
    }
}

fn has_two_decimals(value: f64) -> bool {
    let scaled = value * 100.0;
    (scaled - scaled.round()).abs() < 1e-6
}

// ============================================================================
// Pipeline Scenarios
// ============================================================================

#[tokio::test]
async fn test_two_pages_with_tether_yield_top_100() {
    let dir = tempdir().unwrap();
    let mock = create_two_page_mock();
    let pipeline = HeatmapPipeline::new(mock.clone(), create_config(dir.path()));

    let report = pipeline.run().await.unwrap();
    let coins = &report.bundle.coins;

    assert_eq!(
        mock.get_calls(),
        vec![PageRequest::new(1, 125), PageRequest::new(2, 125)]
    );
    assert_eq!(report.raw_records, 250);
    assert_eq!(report.excluded, 2);
    assert_eq!(coins.len(), 100);
    assert!(coins.iter().all(|c| c.id != "tether"));
    assert!(coins.windows(2).all(|w| w[0].market_cap >= w[1].market_cap));
    assert_eq!(report.top_symbols(5), vec!["C0", "C1", "C2", "C3", "C4"]);
    assert_eq!(coins[99].id, "coin-99");
}

#[tokio::test]
async fn test_fewer_coins_than_top_n() {
    let dir = tempdir().unwrap();
    let mock = MockMarketData::new()
        .with_page(1, vec![create_raw_coin(0, 30.0), create_tether(), create_raw_coin(1, 20.0)])
        .with_page(2, vec![create_raw_coin(2, 40.0)]);
    let pipeline = HeatmapPipeline::new(mock, create_config(dir.path()));

    let report = pipeline.run().await.unwrap();
    let ids: Vec<_> = report.bundle.coins.iter().map(|c| c.id.as_str()).collect();

    assert_eq!(ids, vec!["coin-2", "coin-0", "coin-1"]);
}

#[tokio::test]
async fn test_extra_stablecoins_are_excluded() {
    let dir = tempdir().unwrap();
    let mock = MockMarketData::new()
        .with_page(1, vec![create_raw_coin(0, 30.0), create_raw_coin(1, 20.0)]);
    let config = PipelineConfig {
        pages: 1,
        stablecoins: StablecoinSet::with_extra(["coin-0"]),
        ..create_config(dir.path())
    };

    let report = HeatmapPipeline::new(mock, config).run().await.unwrap();

    assert_eq!(report.excluded, 1);
    assert_eq!(report.bundle.coins.len(), 1);
    assert_eq!(report.bundle.coins[0].id, "coin-1");
}

#[tokio::test]
async fn test_percentages_rounded_to_two_decimals() {
    let dir = tempdir().unwrap();
    let pipeline = HeatmapPipeline::new(create_two_page_mock(), create_config(dir.path()));

    let report = pipeline.run().await.unwrap();

    for coin in &report.bundle.coins {
        assert!(has_two_decimals(coin.price_change_percentage_24h), "{}", coin.id);
        assert!(has_two_decimals(coin.price_change_percentage_7d), "{}", coin.id);
        assert!(has_two_decimals(coin.price_change_percentage_30d), "{}", coin.id);
        assert!(has_two_decimals(coin.ath_change_percentage), "{}", coin.id);
    }
    // Currency-qualified values win over the plain ones
    assert_eq!(report.bundle.coins[0].price_change_percentage_7d, 3.14);
    assert_eq!(report.bundle.coins[0].price_change_percentage_30d, -12.35);
}

#[tokio::test]
async fn test_flat_qualified_change_is_not_replaced() {
    let dir = tempdir().unwrap();
    let mut flat = create_raw_coin(0, 10.0);
    flat.price_change_percentage_7d_in_currency = Some(0.0);
    flat.price_change_percentage_7d = Some(5.0);
    flat.price_change_percentage_30d_in_currency = Some(0.0);
    flat.price_change_percentage_30d = Some(-7.5);
    let mock = MockMarketData::new().with_page(1, vec![flat]);

    let report = HeatmapPipeline::new(mock, create_config(dir.path())).run().await.unwrap();
    let bare: serde_json::Value =
        serde_json::from_slice(&fs::read(&report.heatmap_path).unwrap()).unwrap();

    assert_eq!(bare[0]["price_change_percentage_7d"], serde_json::json!(0.0));
    assert_eq!(bare[0]["price_change_percentage_30d"], serde_json::json!(0.0));
}

// ============================================================================
// Artifacts
// ============================================================================

#[tokio::test]
async fn test_artifacts_round_trip() {
    let dir = tempdir().unwrap();
    let pipeline = HeatmapPipeline::new(create_two_page_mock(), create_config(dir.path()));

    let report = pipeline.run().await.unwrap();

    let bare: Vec<NormalizedCoinRecord> =
        serde_json::from_slice(&fs::read(&report.heatmap_path).unwrap()).unwrap();
    let meta = load_meta(&report.meta_path).unwrap();

    assert_eq!(meta.total_coins, meta.coins.len());
    assert_eq!(meta.coins, bare);
    assert_eq!(bare, report.bundle.coins);
    assert!(meta.updated_at().is_some());
    assert!(meta.updated_at.ends_with("+00:00"));
}

#[tokio::test]
async fn test_max_supply_null_survives_persistence() {
    let dir = tempdir().unwrap();
    let pipeline = HeatmapPipeline::new(create_two_page_mock(), create_config(dir.path()));

    let report = pipeline.run().await.unwrap();
    let bare: serde_json::Value =
        serde_json::from_slice(&fs::read(&report.heatmap_path).unwrap()).unwrap();

    // coin-0 has a cap, coin-1 does not
    assert_eq!(bare[0]["max_supply"], serde_json::json!(21_000_000.0));
    assert!(bare[1]["max_supply"].is_null());
    assert!(bare[1].as_object().unwrap().contains_key("max_supply"));
}

#[tokio::test]
async fn test_missing_rank_defaults_in_output() {
    let dir = tempdir().unwrap();
    let mut unranked = create_raw_coin(0, 10.0);
    unranked.market_cap_rank = None;
    let mock = MockMarketData::new().with_page(1, vec![unranked]);

    let report = HeatmapPipeline::new(mock, create_config(dir.path())).run().await.unwrap();
    assert_eq!(report.bundle.coins[0].market_cap_rank, 999);
}

// ============================================================================
// Failure Behaviour
// ============================================================================

#[tokio::test]
async fn test_second_page_error_leaves_previous_output() {
    let dir = tempdir().unwrap();
    let paths = OutputPaths::new(dir.path());
    fs::write(paths.heatmap_path(), "[\"previous\"]").unwrap();
    fs::write(paths.meta_path(), "{\"previous\":true}").unwrap();

    let mock = MockMarketData::new()
        .with_page(1, vec![create_raw_coin(0, 10.0)])
        .with_status_failure(2, 500);
    let pipeline = HeatmapPipeline::new(mock.clone(), create_config(dir.path()));

    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Fetch(MarketDataError::Status { page: 2, status: 500, .. })
    ));
    assert_eq!(mock.get_calls().len(), 2);
    assert_eq!(fs::read_to_string(paths.heatmap_path()).unwrap(), "[\"previous\"]");
    assert_eq!(fs::read_to_string(paths.meta_path()).unwrap(), "{\"previous\":true}");
}

// ============================================================================
// Pacing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_delay_only_between_pages() {
    let dir = tempdir().unwrap();
    let mock = create_two_page_mock();
    let config = PipelineConfig {
        page_delay: Duration::from_millis(1500),
        ..create_config(dir.path())
    };
    let pipeline = HeatmapPipeline::new(mock.clone(), config);

    let start = tokio::time::Instant::now();
    pipeline.run().await.unwrap();
    let elapsed = start.elapsed();

    let times = mock.call_times();
    assert_eq!(times.len(), 2);
    let gap = times[1] - times[0];
    assert!(gap >= Duration::from_millis(1500) && gap < Duration::from_millis(1600));
    // No trailing pause after the final page
    assert!(elapsed < Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn test_three_pages_two_delays() {
    let dir = tempdir().unwrap();
    let mock = MockMarketData::new();
    let config = PipelineConfig {
        pages: 3,
        page_delay: Duration::from_millis(1500),
        ..create_config(dir.path())
    };
    let pipeline = HeatmapPipeline::new(mock.clone(), config);

    let start = tokio::time::Instant::now();
    let report = pipeline.run().await.unwrap();

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(mock.get_calls().len(), 3);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(3000) && elapsed < Duration::from_millis(3100));
    assert!(report.bundle.coins.is_empty());
}

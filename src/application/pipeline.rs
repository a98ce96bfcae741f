//! Heatmap Pipeline
//!
//! One unattended run: fetch listing pages, drop stablecoins, normalize,
//! rank by market cap, persist both artifacts. Strictly sequential; the
//! first failure ends the run and nothing is written.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::persistence::{HeatmapWriter, OutputPaths, PersistError};
use crate::domain::{
    rank_by_market_cap, NormalizedCoinRecord, OutputBundle, RawMarketRecord, StablecoinSet,
    DEFAULT_TOP_N,
};
use crate::ports::market_data::{MarketDataError, MarketDataSource, PageRequest};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Market data fetch failed: {0}")]
    Fetch(#[from] MarketDataError),
    #[error("Persisting heatmap failed: {0}")]
    Persist(#[from] PersistError),
}

/// Immutable run settings
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Listing pages fetched, starting at page 1
    pub pages: u32,
    pub per_page: u32,
    /// Pause between consecutive page requests (not after the last)
    pub page_delay: Duration,
    pub top_n: usize,
    pub stablecoins: StablecoinSet,
    pub output: OutputPaths,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pages: 2,
            per_page: 125,
            page_delay: Duration::from_millis(1500),
            top_n: DEFAULT_TOP_N,
            stablecoins: StablecoinSet::default(),
            output: OutputPaths::default(),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub pages_fetched: u32,
    pub raw_records: usize,
    pub excluded: usize,
    pub bundle: OutputBundle,
    pub heatmap_path: PathBuf,
    pub meta_path: PathBuf,
}

impl PipelineReport {
    /// Uppercased symbols of the first `n` ranked coins
    pub fn top_symbols(&self, n: usize) -> Vec<String> {
        self.bundle.top_symbols(n)
    }
}

/// Fetch → filter → normalize → rank → persist
pub struct HeatmapPipeline<S: MarketDataSource> {
    source: S,
    config: PipelineConfig,
    writer: HeatmapWriter,
}

impl<S: MarketDataSource> HeatmapPipeline<S> {
    pub fn new(source: S, config: PipelineConfig) -> Self {
        let writer = HeatmapWriter::new(config.output.clone());
        Self { source, config, writer }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute one complete run
    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let raw = self.fetch_all().await?;
        let raw_records = raw.len();

        let (coins, excluded) = self.process(&raw);
        tracing::info!("{} coins processed (stablecoins excluded: {})", coins.len(), excluded);

        let bundle = OutputBundle::now(coins);
        self.writer.write(&bundle)?;

        Ok(PipelineReport {
            pages_fetched: self.config.pages,
            raw_records,
            excluded,
            bundle,
            heatmap_path: self.config.output.heatmap_path(),
            meta_path: self.config.output.meta_path(),
        })
    }

    /// Fetch every configured page in order, pausing between requests
    pub async fn fetch_all(&self) -> Result<Vec<RawMarketRecord>, MarketDataError> {
        let mut all = Vec::new();

        for page in 1..=self.config.pages {
            tracing::info!("Fetching page {}...", page);
            let records = self
                .source
                .fetch_page(PageRequest::new(page, self.config.per_page))
                .await?;
            all.extend(records);

            if page < self.config.pages && !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }

        Ok(all)
    }

    /// Filter, normalize and rank. Returns the ranked coins and how many
    /// stablecoins were dropped.
    pub fn process(&self, raw: &[RawMarketRecord]) -> (Vec<NormalizedCoinRecord>, usize) {
        let (excluded, kept): (Vec<_>, Vec<_>) = raw
            .iter()
            .partition(|r| self.config.stablecoins.excludes(r));

        let normalized = kept.into_iter().map(NormalizedCoinRecord::from_raw).collect();
        (rank_by_market_cap(normalized, self.config.top_n), excluded.len())
    }
}

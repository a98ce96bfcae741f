//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching
//! config/heatmap.toml. Every key has a default, so an empty file (or no
//! file at all) reproduces the standard hourly snapshot.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::adapters::coingecko::CoinGeckoConfig;
use crate::adapters::persistence::{
    OutputPaths, DEFAULT_HEATMAP_FILE, DEFAULT_META_FILE, DEFAULT_OUTPUT_DIR,
};
use crate::application::PipelineConfig;
use crate::domain::{StablecoinSet, DEFAULT_TOP_N};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/heatmap.toml";

/// Provider's upper bound for `per_page`
pub const MAX_PER_PAGE: u32 = 250;

/// Upper bound for `pages` (25,000 records at the largest page size)
pub const MAX_PAGES: u32 = 100;

/// Main configuration structure matching heatmap.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderSection,
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub filter: FilterSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Market data provider section
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSection {
    /// CoinGecko API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Quote currency
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Price change windows requested from the provider
    #[serde(default = "default_price_change_windows")]
    pub price_change_windows: Vec<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Pagination and ranking section
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSection {
    /// Number of listing pages fetched per run
    #[serde(default = "default_pages")]
    pub pages: u32,
    /// Records per page (headroom over top_n for excluded stablecoins)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Pause between page requests, for the free tier rate limit
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    /// Coins kept after ranking
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Exclusion filter section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterSection {
    /// Identifiers excluded on top of the built-in stablecoin list
    #[serde(default)]
    pub extra_stablecoins: Vec<String>,
}

/// Output artifacts section
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    /// Output directory (`~` is expanded)
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default = "default_heatmap_file")]
    pub heatmap_file: String,
    #[serde(default = "default_meta_file")]
    pub meta_file: String,
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_api_base_url() -> String { CoinGeckoConfig::default().api_base_url }
fn default_vs_currency() -> String { "usd".to_string() }
fn default_locale() -> String { "en".to_string() }
fn default_price_change_windows() -> Vec<String> { vec!["24h".into(), "7d".into(), "30d".into()] }
fn default_timeout_secs() -> u64 { 30 }
fn default_pages() -> u32 { 2 }
fn default_per_page() -> u32 { 125 }
fn default_page_delay_ms() -> u64 { 1500 }
fn default_top_n() -> usize { DEFAULT_TOP_N }
fn default_output_dir() -> String { DEFAULT_OUTPUT_DIR.to_string() }
fn default_heatmap_file() -> String { DEFAULT_HEATMAP_FILE.to_string() }
fn default_meta_file() -> String { DEFAULT_META_FILE.to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            vs_currency: default_vs_currency(),
            locale: default_locale(),
            price_change_windows: default_price_change_windows(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            per_page: default_per_page(),
            page_delay_ms: default_page_delay_ms(),
            top_n: default_top_n(),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            heatmap_file: default_heatmap_file(),
            meta_file: default_meta_file(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl ProviderSection {
    /// Get API base URL with environment variable override
    /// Checks COINGECKO_API_BASE_URL env var first, falls back to config value
    pub fn get_api_base_url(&self) -> String {
        std::env::var("COINGECKO_API_BASE_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.api_base_url.clone())
    }
}

impl OutputSection {
    /// Get output directory with environment variable override and `~` expansion
    /// Checks HEATMAP_OUTPUT_DIR env var first, falls back to config value
    pub fn get_dir(&self) -> PathBuf {
        let dir = std::env::var("HEATMAP_OUTPUT_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.dir.clone());
        expand_dir(&dir)
    }
}

/// Expand a leading `~` in a directory setting
pub fn expand_dir(dir: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(dir).into_owned())
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration, falling back to defaults when the file does not exist
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        let config = Config::default();
        config.validate()?;
        return Ok(config);
    }
    load_config(path)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.api_base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "api_base_url cannot be empty".to_string(),
            ));
        }

        if self.provider.vs_currency.is_empty() {
            return Err(ConfigError::ValidationError(
                "vs_currency cannot be empty".to_string(),
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".to_string(),
            ));
        }

        if self.pipeline.pages == 0 || self.pipeline.pages > MAX_PAGES {
            return Err(ConfigError::ValidationError(format!(
                "pages must be 1-{}, got {}",
                MAX_PAGES, self.pipeline.pages
            )));
        }

        if self.pipeline.per_page == 0 || self.pipeline.per_page > MAX_PER_PAGE {
            return Err(ConfigError::ValidationError(format!(
                "per_page must be 1-{}, got {}",
                MAX_PER_PAGE, self.pipeline.per_page
            )));
        }

        if self.pipeline.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "top_n must be > 0".to_string(),
            ));
        }

        if self.output.heatmap_file.is_empty() || self.output.meta_file.is_empty() {
            return Err(ConfigError::ValidationError(
                "output file names cannot be empty".to_string(),
            ));
        }

        if self.output.heatmap_file == self.output.meta_file {
            return Err(ConfigError::ValidationError(format!(
                "heatmap_file and meta_file must differ, both are {}",
                self.output.heatmap_file
            )));
        }

        Ok(())
    }

    /// Market data client settings
    pub fn coingecko_config(&self) -> CoinGeckoConfig {
        CoinGeckoConfig {
            api_base_url: self.provider.get_api_base_url(),
            vs_currency: self.provider.vs_currency.clone(),
            locale: self.provider.locale.clone(),
            price_change_windows: self.provider.price_change_windows.clone(),
            timeout: Duration::from_secs(self.provider.timeout_secs),
        }
    }

    /// Artifact locations
    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths {
            dir: self.output.get_dir(),
            heatmap_file: self.output.heatmap_file.clone(),
            meta_file: self.output.meta_file.clone(),
        }
    }
}

// Conversion from Config to PipelineConfig
impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        PipelineConfig {
            pages: config.pipeline.pages,
            per_page: config.pipeline.per_page,
            page_delay: Duration::from_millis(config.pipeline.page_delay_ms),
            top_n: config.pipeline.top_n,
            stablecoins: StablecoinSet::with_extra(config.filter.extra_stablecoins.iter().cloned()),
            output: config.output_paths(),
        }
    }
}

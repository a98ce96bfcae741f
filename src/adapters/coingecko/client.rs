//! CoinGecko Markets Client
//!
//! HTTP client for the `/coins/markets` listing. One GET per page, a fixed
//! per-request timeout, and no retry: any failure is returned to the caller.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::{header, Client};

use crate::domain::RawMarketRecord;
use crate::ports::market_data::{MarketDataError, MarketDataSource, PageRequest};

/// Error bodies are cut to this many bytes before being reported
const MAX_ERROR_BODY: usize = 200;

/// CoinGecko client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CoinGeckoConfig {
    /// Base URL for the API, without trailing slash
    pub api_base_url: String,
    /// Quote currency for prices and market caps
    pub vs_currency: String,
    /// Locale for names
    pub locale: String,
    /// Windows requested for price change percentages
    pub price_change_windows: Vec<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            // Free public tier, no API key
            api_base_url: "https://api.coingecko.com/api/v3".to_string(),
            vs_currency: "usd".to_string(),
            locale: "en".to_string(),
            price_change_windows: vec!["24h".into(), "7d".into(), "30d".into()],
            timeout: Duration::from_secs(30),
        }
    }
}

/// CoinGecko markets listing client
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    config: CoinGeckoConfig,
    http: Client,
}

impl CoinGeckoClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, MarketDataError> {
        Self::with_config(CoinGeckoConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: CoinGeckoConfig) -> Result<Self, MarketDataError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("crypto-heatmap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MarketDataError::Client(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// Full URL of the markets listing
    pub fn markets_url(&self) -> String {
        format!("{}/coins/markets", self.config.api_base_url.trim_end_matches('/'))
    }

    /// Query parameters for one page, in the order they are sent
    pub fn query_params(&self, request: PageRequest) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.config.vs_currency.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", request.per_page.to_string()),
            ("page", request.page.to_string()),
            ("sparkline", "false".to_string()),
            ("price_change_percentage", self.config.price_change_windows.join(",")),
            ("locale", self.config.locale.clone()),
        ]
    }

    /// Fetch one page of the markets listing
    pub async fn get_markets(&self, request: PageRequest) -> Result<Vec<RawMarketRecord>, MarketDataError> {
        let page = request.page;
        tracing::debug!("GET {} page={} per_page={}", self.markets_url(), page, request.per_page);

        let response = self.http
            .get(self.markets_url())
            .query(&self.query_params(request))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| MarketDataError::Transport { page, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Status {
                page,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| MarketDataError::Transport { page, source })?;

        let records: Vec<RawMarketRecord> = serde_json::from_slice(&bytes)
            .map_err(|source| MarketDataError::Decode { page, source })?;

        tracing::debug!("Page {} returned {} records", page, records.len());
        Ok(records)
    }

    pub fn config(&self) -> &CoinGeckoConfig {
        &self.config
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<RawMarketRecord>, MarketDataError> {
        self.get_markets(request).await
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

//! Market Data Port
//!
//! One paginated fetch from a markets listing. The pipeline drives
//! pagination and pacing; implementations only answer single pages.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::RawMarketRecord;

/// Market data error type
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request for page {page} failed: {source}")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("Page {page} returned HTTP {status}: {body}")]
    Status { page: u32, status: u16, body: String },

    #[error("Page {page} is not a valid markets listing: {source}")]
    Decode {
        page: u32,
        #[source]
        source: serde_json::Error,
    },
}

impl MarketDataError {
    /// Page the failure belongs to, when known
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Client(_) => None,
            Self::Transport { page, .. } | Self::Status { page, .. } | Self::Decode { page, .. } => {
                Some(*page)
            }
        }
    }
}

/// Markets listing page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

/// Source of raw market records
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch one page of the listing, ordered by market cap descending
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<RawMarketRecord>, MarketDataError>;
}

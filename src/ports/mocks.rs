use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;

use crate::domain::RawMarketRecord;
use super::market_data::{MarketDataError, MarketDataSource, PageRequest};

/// Mock market data source that records calls and serves canned pages
#[derive(Debug, Default, Clone)]
pub struct MockMarketData {
    calls: Arc<Mutex<Vec<(PageRequest, tokio::time::Instant)>>>,
    pages: Arc<Mutex<HashMap<u32, Vec<RawMarketRecord>>>>,
    failures: Arc<Mutex<HashMap<u32, u16>>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to serve a page
    pub fn with_page(self, page: u32, records: Vec<RawMarketRecord>) -> Self {
        self.pages.lock().unwrap().insert(page, records);
        self
    }

    /// Builder method to fail a page with an HTTP status
    pub fn with_status_failure(self, page: u32, status: u16) -> Self {
        self.failures.lock().unwrap().insert(page, status);
        self
    }

    /// Get all recorded page requests
    pub fn get_calls(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().iter().map(|(req, _)| *req).collect()
    }

    /// Instants at which each request arrived
    pub fn call_times(&self) -> Vec<tokio::time::Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl MarketDataSource for MockMarketData {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<RawMarketRecord>, MarketDataError> {
        self.calls.lock().unwrap().push((request, tokio::time::Instant::now()));

        if let Some(status) = self.failures.lock().unwrap().get(&request.page) {
            return Err(MarketDataError::Status {
                page: request.page,
                status: *status,
                body: "mock failure".to_string(),
            });
        }

        Ok(self
            .pages
            .lock()
            .unwrap()
            .get(&request.page)
            .cloned()
            .unwrap_or_default())
    }
}

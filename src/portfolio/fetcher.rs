use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, Instrument};

use super::types::{HoldingRecord, PriceIndex};
use crate::api::PriceSource;
use crate::errors::{Result, ReturnError};

/// Fetches the latest closing price for every distinct ticker in a portfolio
pub struct PriceFetcher {
    source: Arc<dyn PriceSource>,
    max_concurrent_requests: usize,
}

impl PriceFetcher {
    pub fn new(source: Arc<dyn PriceSource>, max_concurrent_requests: usize) -> Self {
        Self {
            source,
            max_concurrent_requests: max_concurrent_requests.max(1),
        }
    }

    /// Fetch all prices concurrently and build the index once every task has finished.
    ///
    /// Each ticker is requested once even when several holdings share it. Tasks never
    /// touch shared state: each returns its own result and the index is assembled here,
    /// after the join. If any request failed, all failures are logged and the first one
    /// (in holdings order) is returned.
    pub async fn fetch_prices(&self, holdings: &[HoldingRecord], token: &str) -> Result<PriceIndex> {
        let tickers = unique_tickers(holdings);
        if tickers.is_empty() {
            debug!("No holdings, skipping price fetch");
            return Ok(PriceIndex::new());
        }

        info!(
            ticker_count = tickers.len(),
            holding_count = holdings.len(),
            max_concurrent = self.max_concurrent_requests,
            "Fetching latest closing prices"
        );

        let permits = Arc::new(Semaphore::new(self.max_concurrent_requests));
        let token: Arc<str> = Arc::from(token);

        let tasks: Vec<_> = tickers
            .iter()
            .map(|ticker| {
                let source = Arc::clone(&self.source);
                let permits = Arc::clone(&permits);
                let token = Arc::clone(&token);
                let ticker = ticker.clone();
                let span = tracing::info_span!("fetch_price", ticker = %ticker);

                tokio::spawn(
                    async move {
                        let _permit = match permits.acquire_owned().await {
                            Ok(permit) => permit,
                            Err(e) => return Err(ReturnError::Task(e.to_string())),
                        };
                        source.latest_close(&ticker, &token).await
                    }
                    .instrument(span),
                )
            })
            .collect();

        // Full barrier: nothing is read until every task has completed
        let results = futures::future::join_all(tasks).await;

        let mut prices = PriceIndex::new();
        let mut failures: Vec<ReturnError> = Vec::new();

        for (ticker, joined) in tickers.into_iter().zip(results) {
            let outcome: Result<Decimal> = joined.map_err(ReturnError::from).and_then(|r| r);
            match outcome {
                Ok(price) => {
                    debug!("{} -> {}", ticker, price);
                    prices.insert(ticker, price);
                }
                Err(e) => {
                    error!("Failed to fetch price for {}: {}", ticker, e);
                    failures.push(e);
                }
            }
        }

        if !failures.is_empty() {
            error!("{} of {} price requests failed", failures.len(), failures.len() + prices.len());
            return Err(failures.remove(0));
        }

        info!("Fetched {} prices", prices.len());
        Ok(prices)
    }
}

/// Distinct tickers in first-seen order
pub fn unique_tickers(holdings: &[HoldingRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    holdings
        .iter()
        .filter(|h| seen.insert(h.ticker.as_str()))
        .map(|h| h.ticker.clone())
        .collect()
}


use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::PriceSource;
use crate::errors::{Result, ReturnError};

pub(crate) fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// In-memory price source that records every request it serves
#[derive(Default)]
pub(crate) struct FakePriceSource {
    prices: HashMap<String, Decimal>,
    failures: HashMap<String, fn(&str) -> ReturnError>,
    delay: Option<Duration>,
    requests: Mutex<Vec<(String, String)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakePriceSource {
    pub fn with_prices(prices: &[(&str, &str)]) -> Self {
        Self {
            prices: prices
                .iter()
                .map(|(ticker, price)| (ticker.to_string(), dec(price)))
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing(mut self, ticker: &str, make_error: fn(&str) -> ReturnError) -> Self {
        self.failures.insert(ticker.to_string(), make_error);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requested_tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|(ticker, _)| ticker.clone())
            .collect();
        tickers.sort();
        tickers
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, token)| token.clone())
            .collect()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for FakePriceSource {
    async fn latest_close(&self, ticker: &str, token: &str) -> Result<Decimal> {
        self.requests
            .lock()
            .unwrap()
            .push((ticker.to_string(), token.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(make_error) = self.failures.get(ticker) {
            return Err(make_error(ticker));
        }

        self.prices
            .get(ticker)
            .copied()
            .ok_or_else(|| ReturnError::no_price_data(ticker))
    }
}

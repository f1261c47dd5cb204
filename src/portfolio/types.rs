use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user's position in a single stock, as read from the holdings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "NumShares")]
    pub num_shares: i64,
    #[serde(rename = "AvgPricePerShare")]
    pub avg_price_per_share: Decimal,
}

impl HoldingRecord {
    pub fn new(ticker: impl Into<String>, num_shares: i64, avg_price_per_share: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            num_shares,
            avg_price_per_share,
        }
    }

    /// Amount originally paid for the position, `None` if it does not fit a `Decimal`
    pub fn cost_basis(&self) -> Option<Decimal> {
        Decimal::from(self.num_shares).checked_mul(self.avg_price_per_share)
    }
}

/// Daily end-of-day record from the market data provider
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPriceSample {
    pub date: DateTime<Utc>,
    pub close: Decimal,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub adj_open: Option<Decimal>,
    pub adj_high: Option<Decimal>,
    pub adj_low: Option<Decimal>,
    pub adj_close: Option<Decimal>,
    pub adj_volume: Option<Decimal>,
    pub div_cash: Option<Decimal>,
    pub split_factor: Option<Decimal>,
}

/// Latest closing price per ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceIndex {
    prices: HashMap<String, Decimal>,
}

impl PriceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: impl Into<String>, price: Decimal) -> Option<Decimal> {
        self.prices.insert(ticker.into(), price)
    }

    pub fn get(&self, ticker: &str) -> Option<Decimal> {
        self.prices.get(ticker).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for PriceIndex {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Computed return for a single holding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingReturn {
    pub ticker: String,
    pub num_shares: i64,
    pub avg_price_per_share: Decimal,
    pub current_price: Decimal,
    pub cost_basis: Decimal,
    pub current_value: Decimal,
    pub return_amount: Decimal,
}

/// Aggregate figures across every holding
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioTotals {
    pub total_shares: i64,
    pub total_cost: Decimal,
    pub total_value: Decimal,
    pub total_return: Decimal,
}

/// Everything the report renderers need
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnReport {
    pub holdings: Vec<HoldingReturn>,
    pub totals: PortfolioTotals,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_tickers: Vec<String>,
}

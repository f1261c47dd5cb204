pub mod tiingo;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;

pub use tiingo::{parse_latest_close, TiingoClient};

/// A source of the latest closing price for a ticker
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn latest_close(&self, ticker: &str, token: &str) -> Result<Decimal>;
}

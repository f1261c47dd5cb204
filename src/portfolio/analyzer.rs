use rust_decimal::Decimal;
use tracing::warn;

use super::types::*;
use crate::errors::{Result, ReturnError};

/// Computes per-holding and aggregate returns
pub struct PortfolioAnalyzer;

impl PortfolioAnalyzer {
    /// Price every holding against `prices`.
    ///
    /// A ticker missing from the index is valued at zero and reported in
    /// `missing_tickers`. Amounts that overflow fail with `ReturnError::Overflow`.
    pub fn compute(holdings: &[HoldingRecord], prices: &PriceIndex) -> Result<ReturnReport> {
        let mut missing_tickers: Vec<String> = Vec::new();
        let mut rows: Vec<HoldingReturn> = Vec::with_capacity(holdings.len());

        for holding in holdings {
            let current_price = prices.get(&holding.ticker).unwrap_or_else(|| {
                if !missing_tickers.contains(&holding.ticker) {
                    warn!("No price available for {}, valuing at 0", holding.ticker);
                    missing_tickers.push(holding.ticker.clone());
                }
                Decimal::ZERO
            });
            rows.push(Self::holding_return(holding, current_price)?);
        }

        let totals = Self::totals(&rows)?;

        Ok(ReturnReport {
            holdings: rows,
            totals,
            missing_tickers,
        })
    }

    fn holding_return(holding: &HoldingRecord, current_price: Decimal) -> Result<HoldingReturn> {
        let overflow = |what: &str| {
            ReturnError::overflow(format!("{} of {} holding", what, holding.ticker))
        };
        let shares = Decimal::from(holding.num_shares);

        let cost_basis = holding.cost_basis().ok_or_else(|| overflow("cost basis"))?;
        let current_value = shares
            .checked_mul(current_price)
            .ok_or_else(|| overflow("current value"))?;
        let return_amount = current_price
            .checked_sub(holding.avg_price_per_share)
            .and_then(|per_share| shares.checked_mul(per_share))
            .ok_or_else(|| overflow("return"))?;

        Ok(HoldingReturn {
            ticker: holding.ticker.clone(),
            num_shares: holding.num_shares,
            avg_price_per_share: holding.avg_price_per_share,
            current_price,
            cost_basis,
            current_value,
            return_amount,
        })
    }

    fn totals(rows: &[HoldingReturn]) -> Result<PortfolioTotals> {
        let mut totals = PortfolioTotals::default();

        for row in rows {
            totals.total_shares = totals
                .total_shares
                .checked_add(row.num_shares)
                .ok_or_else(|| ReturnError::overflow("total shares"))?;
            totals.total_cost = totals
                .total_cost
                .checked_add(row.cost_basis)
                .ok_or_else(|| ReturnError::overflow("total cost"))?;
            totals.total_value = totals
                .total_value
                .checked_add(row.current_value)
                .ok_or_else(|| ReturnError::overflow("total value"))?;
        }

        totals.total_return = totals
            .total_value
            .checked_sub(totals.total_cost)
            .ok_or_else(|| ReturnError::overflow("total return"))?;
        Ok(totals)
    }
}

use std::io::Write;

use super::types::{HoldingReturn, PortfolioTotals, ReturnReport};
use crate::constants::REPORT_SEPARATOR_WIDTH;
use crate::errors::{Result, ReturnError};
use crate::utils::{format_money, pad_right};

const HEADER: &str = "| Ticker | Shares | Avg Cost | Current Value |   Return   |";

fn separator() -> String {
    "-".repeat(REPORT_SEPARATOR_WIDTH)
}

fn row(label: &str, shares: i64, cost: &str, value: &str, ret: &str) -> String {
    format!(
        "|{}|  {}| {}|    {}|  {}|",
        label,
        pad_right(&shares.to_string(), 6),
        pad_right(cost, 9),
        pad_right(value, 11),
        pad_right(ret, 10),
    )
}

fn holding_row(holding: &HoldingReturn) -> String {
    row(
        &format!("  {}", pad_right(&holding.ticker, 6)),
        holding.num_shares,
        &format_money(holding.avg_price_per_share),
        &format_money(holding.current_value),
        &format_money(holding.return_amount),
    )
}

fn totals_row(totals: &PortfolioTotals) -> String {
    row(
        " TOTALS ",
        totals.total_shares,
        &format_money(totals.total_cost),
        &format_money(totals.total_value),
        &format_money(totals.total_return),
    )
}

/// Render the fixed-width return table, one line per entry, newline terminated
pub fn render_table(report: &ReturnReport) -> String {
    let separator = separator();
    let mut lines = vec![separator.clone(), HEADER.to_string(), separator.clone()];

    for holding in &report.holdings {
        lines.push(holding_row(holding));
        lines.push(separator.clone());
    }

    lines.push(totals_row(&report.totals));
    lines.push(separator);

    let mut table = lines.join("\n");
    table.push('\n');
    table
}

pub fn write_table<W: Write>(report: &ReturnReport, writer: &mut W) -> Result<()> {
    writer
        .write_all(render_table(report).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| ReturnError::io("<stdout>", e))
}

/// Render the report as pretty-printed JSON
pub fn render_json(report: &ReturnReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn write_json<W: Write>(report: &ReturnReport, writer: &mut W) -> Result<()> {
    let json = render_json(report)?;
    writeln!(writer, "{}", json)
        .and_then(|_| writer.flush())
        .map_err(|e| ReturnError::io("<stdout>", e))
}

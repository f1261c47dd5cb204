use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::types::HoldingRecord;
use crate::errors::{Result, ReturnError};

/// Parse the holdings file: a JSON array of `{Ticker, NumShares, AvgPricePerShare}`
pub fn load_holdings(path: impl AsRef<Path>) -> Result<Vec<HoldingRecord>> {
    let path = path.as_ref();
    let contents = fs::read(path).map_err(|e| ReturnError::io(path, e))?;

    let holdings = parse_holdings(&contents)?;
    info!("Loaded {} holdings from {}", holdings.len(), path.display());
    Ok(holdings)
}

/// Parse holdings from an in-memory JSON document; bytes that are not UTF-8 are a parse error
pub fn parse_holdings(contents: impl AsRef<[u8]>) -> Result<Vec<HoldingRecord>> {
    let holdings: Vec<HoldingRecord> = serde_json::from_slice(contents.as_ref())
        .map_err(|e| ReturnError::parse(format!("invalid holdings file: {}", e)))?;

    if let Some(position) = holdings.iter().position(|h| h.ticker.trim().is_empty()) {
        return Err(ReturnError::parse(format!(
            "invalid holdings file: entry {} has an empty Ticker",
            position
        )));
    }

    Ok(holdings)
}

/// Read the API token: first line of the file, surrounding whitespace trimmed
pub fn read_api_token(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| ReturnError::io(path, e))?;

    let token = contents.lines().next().unwrap_or_default().trim().to_string();
    debug!("Read API token ({} chars) from {}", token.len(), path.display());
    Ok(token)
}

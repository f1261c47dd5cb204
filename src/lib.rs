//! Total return report for a stock portfolio.
//!
//! Holdings are read from a JSON file, the latest closing price of each distinct
//! ticker is fetched concurrently from Tiingo, and a fixed-width return table is
//! written to stdout.

pub mod api;
pub mod cli;
pub mod constants;
pub mod errors;
pub mod observability;
pub mod portfolio;
pub mod utils;

pub use errors::{Result, ReturnError};

#[cfg(test)]
mod tests;

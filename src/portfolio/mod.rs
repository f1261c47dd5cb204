pub mod types;
pub mod loader;
pub mod fetcher;
pub mod analyzer;
pub mod report;

pub use types::*;
pub use loader::{load_holdings, read_api_token};
pub use fetcher::PriceFetcher;
pub use analyzer::PortfolioAnalyzer;

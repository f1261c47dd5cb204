// Market data provider
pub const TIINGO_BASE_URL: &str = "https://api.tiingo.com";
pub const USER_AGENT: &str = concat!("portfolio-return/", env!("CARGO_PKG_VERSION"));

// Request limits
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;

// Report layout
pub const REPORT_SEPARATOR_WIDTH: usize = 59;
pub const MONEY_DECIMAL_PLACES: u32 = 2;

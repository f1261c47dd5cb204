pub mod config;
pub mod formatting;
pub mod timeout;

pub use config::{Config, LogFormat, ReportFormat};
pub use formatting::{format_money, pad_right, redact_token};
pub use timeout::with_timeout;

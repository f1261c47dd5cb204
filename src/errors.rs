use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a portfolio return run
#[derive(Error, Debug)]
pub enum ReturnError {
    #[error("expected <path_to_holdings_file> <path_to_api_key_file>")]
    Usage,

    #[error("cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Network(String),

    #[error("operation '{operation}' timed out after {seconds} seconds")]
    Timeout { operation: String, seconds: u64 },

    #[error("no price data available for '{0}'")]
    NoPriceData(String),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("{0}")]
    Config(String),

    #[error("price task failed: {0}")]
    Task(String),
}

impl ReturnError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn no_price_data(ticker: impl Into<String>) -> Self {
        Self::NoPriceData(ticker.into())
    }

    /// Short label for the error taxonomy, used as the diagnostic prefix
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::Io { .. } => "io",
            Self::Parse(_) => "parse",
            Self::Network(_) | Self::Timeout { .. } => "network",
            Self::NoPriceData(_) | Self::Overflow(_) => "data",
            Self::Config(_) => "config",
            Self::Task(_) => "internal",
        }
    }
}

impl From<reqwest::Error> for ReturnError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest embeds the full URL in its messages; the query carries the token
        let err = err.without_url();
        if err.is_decode() {
            Self::Parse(format!("malformed API response: {}", err))
        } else if err.is_timeout() {
            Self::Network(format!("API request timed out: {}", err))
        } else {
            Self::Network(format!("API request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ReturnError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ReturnError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReturnError>;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_REQUEST_TIMEOUT_SECS,
    TIINGO_BASE_URL,
};
use crate::errors::{Result, ReturnError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Market data provider
    pub api_base_url: String,

    // Request limits
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_concurrent_requests: usize,

    // Output
    pub report_format: ReportFormat,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: TIINGO_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            report_format: ReportFormat::Table,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from the process environment, after an optional `.env`
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            api_base_url: lookup("TIINGO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            request_timeout_secs: parse_var(&lookup, "REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),
            connect_timeout_secs: parse_var(&lookup, "CONNECT_TIMEOUT_SECS")?
                .unwrap_or(defaults.connect_timeout_secs),
            max_concurrent_requests: parse_var(&lookup, "MAX_CONCURRENT_REQUESTS")?
                .unwrap_or(defaults.max_concurrent_requests),
            report_format: Self::parse_report_format(lookup("REPORT_FORMAT").as_deref())?,
            log_format: Self::parse_log_format(lookup("LOG_FORMAT").as_deref())?,
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_report_format(value: Option<&str>) -> Result<ReportFormat> {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            None | Some("") | Some("table") => Ok(ReportFormat::Table),
            Some("json") => Ok(ReportFormat::Json),
            Some(other) => Err(ReturnError::config(format!(
                "REPORT_FORMAT must be 'table' or 'json', got '{}'",
                other
            ))),
        }
    }

    fn parse_log_format(value: Option<&str>) -> Result<LogFormat> {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            None | Some("") | Some("pretty") => Ok(LogFormat::Pretty),
            Some("json") => Ok(LogFormat::Json),
            Some(other) => Err(ReturnError::config(format!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(ReturnError::config("TIINGO_BASE_URL cannot be empty"));
        }

        if self.request_timeout_secs == 0 {
            return Err(ReturnError::config("REQUEST_TIMEOUT_SECS must be greater than 0"));
        }

        if self.connect_timeout_secs == 0 {
            return Err(ReturnError::config("CONNECT_TIMEOUT_SECS must be greater than 0"));
        }

        if self.max_concurrent_requests == 0 {
            return Err(ReturnError::config("MAX_CONCURRENT_REQUESTS must be greater than 0"));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ReturnError::config(format!("{} has an invalid value: '{}'", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_base_url, TIINGO_BASE_URL);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.max_concurrent_requests, DEFAULT_MAX_CONCURRENT_REQUESTS);
        assert_eq!(config.report_format, ReportFormat::Table);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("TIINGO_BASE_URL", "http://localhost:8080/"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("MAX_CONCURRENT_REQUESTS", "2"),
            ("REPORT_FORMAT", "JSON"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_concurrent_requests, 2);
        assert_eq!(config.report_format, ReportFormat::Json);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config_from(&[("REQUEST_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("REQUEST_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("MAX_CONCURRENT_REQUESTS", "0")]).is_err());
        assert!(config_from(&[("REPORT_FORMAT", "csv")]).is_err());

        let err = config_from(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert_eq!(err.kind(), "config");
    }
}

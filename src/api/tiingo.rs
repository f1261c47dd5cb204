use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use super::PriceSource;
use crate::constants::USER_AGENT;
use crate::errors::{Result, ReturnError};
use crate::portfolio::types::DailyPriceSample;
use crate::utils::{redact_token, with_timeout, Config};

/// Client for the Tiingo end-of-day prices endpoint
#[derive(Clone)]
pub struct TiingoClient {
    client: Client,
    base_url: String,
    request_timeout: std::time::Duration,
}

impl TiingoClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ReturnError::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            request_timeout: config.request_timeout(),
        })
    }

    /// URL of the latest daily prices for `ticker`; both values are percent-encoded
    pub fn prices_url(&self, ticker: &str, token: &str) -> String {
        format!(
            "{}/tiingo/daily/{}/prices?token={}",
            self.base_url,
            urlencoding::encode(ticker),
            urlencoding::encode(token)
        )
    }

    fn request_error(&self, ticker: &str, err: reqwest::Error) -> ReturnError {
        if err.is_timeout() {
            ReturnError::Timeout {
                operation: format!("price request for {}", ticker),
                seconds: self.request_timeout.as_secs(),
            }
        } else {
            ReturnError::from(err)
        }
    }

    async fn request_latest_close(&self, ticker: &str, token: &str) -> Result<Decimal> {
        let url = self.prices_url(ticker, token);
        debug!("GET {}", redact_token(&url));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(ticker, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Price request for {} failed: {}", ticker, status);
            return Err(ReturnError::network(format!(
                "price request for '{}' failed with status {}",
                ticker, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.request_error(ticker, e))?;
        parse_latest_close(ticker, &body)
    }
}

#[async_trait]
impl PriceSource for TiingoClient {
    #[instrument(skip(self, token))]
    async fn latest_close(&self, ticker: &str, token: &str) -> Result<Decimal> {
        with_timeout(
            self.request_latest_close(ticker, token),
            self.request_timeout,
            &format!("price request for {}", ticker),
        )
        .await
    }
}

/// Extract the most recent closing price from a daily prices response body
pub fn parse_latest_close(ticker: &str, body: &str) -> Result<Decimal> {
    let samples: Vec<DailyPriceSample> = serde_json::from_str(body).map_err(|e| {
        ReturnError::parse(format!("malformed price response for '{}': {}", ticker, e))
    })?;

    // Provider orders samples most recent first
    let latest = samples
        .first()
        .ok_or_else(|| ReturnError::no_price_data(ticker))?;

    debug!("{} closed at {} on {}", ticker, latest.close, latest.date.date_naive());
    Ok(latest.close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const SAMPLE_RESPONSE: &str = r#"[
        {
            "adjClose": 227.48, "adjHigh": 229.0, "adjLow": 225.1, "adjOpen": 226.0,
            "adjVolume": 41234567, "close": 227.48,
            "date": "2024-10-15T00:00:00.000Z",
            "divCash": 0.0, "high": 229.0, "low": 225.1, "open": 226.0,
            "splitFactor": 1.0, "volume": 41234567
        },
        {
            "close": 220.0,
            "date": "2024-10-14T00:00:00.000Z"
        }
    ]"#;

    #[test]
    fn test_parse_latest_close_uses_first_sample() {
        let price = parse_latest_close("AAPL", SAMPLE_RESPONSE).unwrap();
        assert_eq!(price, Decimal::from_str("227.48").unwrap());
    }

    #[test]
    fn test_parse_latest_close_empty_array() {
        let err = parse_latest_close("ZZZZ", "[]").unwrap_err();
        assert!(matches!(err, ReturnError::NoPriceData(ref t) if t == "ZZZZ"));
        assert_eq!(err.kind(), "data");
    }

    #[test]
    fn test_parse_latest_close_malformed() {
        let err = parse_latest_close("AAPL", r#"{"detail": "Invalid token."}"#).unwrap_err();
        assert_eq!(err.kind(), "parse");

        let err = parse_latest_close("AAPL", "not json").unwrap_err();
        assert_eq!(err.kind(), "parse");

        let err = parse_latest_close("AAPL", r#"[{"date": "2024-10-15T00:00:00Z"}]"#).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_prices_url() {
        let config = Config {
            api_base_url: "http://localhost:9999".to_string(),
            ..Config::default()
        };
        let client = TiingoClient::new(&config).unwrap();
        assert_eq!(
            client.prices_url("MSFT", "abc123"),
            "http://localhost:9999/tiingo/daily/MSFT/prices?token=abc123"
        );
    }

    #[test]
    fn test_prices_url_encodes_ticker() {
        let client = TiingoClient::new(&Config::default()).unwrap();
        assert_eq!(
            client.prices_url("BRK/B?x=1&token=evil", "abc123"),
            "https://api.tiingo.com/tiingo/daily/BRK%2FB%3Fx%3D1%26token%3Devil/prices?token=abc123"
        );
        assert_eq!(
            client.prices_url("BRK.B", "a&b"),
            "https://api.tiingo.com/tiingo/daily/BRK.B/prices?token=a%26b"
        );
    }

    #[tokio::test]
    async fn test_stalled_server_is_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold connections without ever answering
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = Config {
            api_base_url: format!("http://{}", addr),
            request_timeout_secs: 1,
            ..Config::default()
        };
        let client = TiingoClient::new(&config).unwrap();
        let err = client.latest_close("AAPL", "token").await.unwrap_err();
        server.abort();

        match err {
            ReturnError::Timeout { operation, seconds } => {
                assert_eq!(operation, "price request for AAPL");
                assert_eq!(seconds, 1);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let config = Config {
            // Port 9 (discard) on localhost is closed in test environments
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 5,
            ..Config::default()
        };
        let client = TiingoClient::new(&config).unwrap();
        let err = client.latest_close("AAPL", "token").await.unwrap_err();
        assert_eq!(err.kind(), "network");
        assert!(!err.to_string().contains("token=token"));
    }
}

//! External quote provider client.
//!
//! Talks to a Polygon-style previous-close aggregate endpoint:
//! `GET /v2/aggs/ticker/{symbol}/prev?adjusted=true&apiKey=...`, price taken
//! from `results[0].c`. No retries; a failure surfaces directly to the caller.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::ProviderConfig;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport or HTTP-status failure talking to the provider.
    #[error("provider request failed: {0}")]
    Http(reqwest::Error),

    /// The provider answered but carried no usable price.
    #[error("Invalid stock data for {symbol}")]
    NoPrice { symbol: String },
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter and this
        // error's message is echoed to the client, so drop the URL.
        ProviderError::Http(err.without_url())
    }
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Previous-close price for a symbol.
    async fn previous_close(&self, symbol: &str) -> Result<f64, ProviderError>;
}

/// Response from the previous-close aggregate endpoint.
#[derive(Debug, Deserialize)]
struct PrevCloseResponse {
    #[serde(default)]
    results: Vec<PrevAgg>,
}

#[derive(Debug, Deserialize)]
struct PrevAgg {
    /// Close price
    c: Option<f64>,
}

fn extract_close(body: PrevCloseResponse, symbol: &str) -> Result<f64, ProviderError> {
    body.results
        .into_iter()
        .next()
        .and_then(|agg| agg.c)
        .ok_or_else(|| ProviderError::NoPrice {
            symbol: symbol.to_string(),
        })
}

pub struct PolygonClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl PolygonClient {
    pub fn new(cfg: &ProviderConfig) -> anyhow::Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl PriceProvider for PolygonClient {
    async fn previous_close(&self, symbol: &str) -> Result<f64, ProviderError> {
        let url = format!("{}/v2/aggs/ticker/{}/prev", self.base_url, symbol);
        let body: PrevCloseResponse = self
            .http
            .get(&url)
            .query(&[("adjusted", "true"), ("apiKey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let price = extract_close(body, symbol)?;
        debug!(symbol, price, "provider previous close");
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_previous_close_payload() {
        let body: PrevCloseResponse = serde_json::from_str(
            r#"{"ticker":"AAPL","results":[{"c":185.64,"o":184.35,"v":12345.0}]}"#,
        )
        .unwrap();
        let price = extract_close(body, "AAPL").expect("price present");
        assert_eq!(price, 185.64);
    }

    #[test]
    fn missing_results_is_no_price() {
        let body: PrevCloseResponse =
            serde_json::from_str(r#"{"ticker":"NOPE","status":"NOT_FOUND"}"#).unwrap();
        let err = extract_close(body, "NOPE").unwrap_err();
        assert!(matches!(err, ProviderError::NoPrice { ref symbol } if symbol == "NOPE"));
    }

    #[test]
    fn null_close_is_no_price() {
        let body: PrevCloseResponse =
            serde_json::from_str(r#"{"results":[{"c":null}]}"#).unwrap();
        assert!(extract_close(body, "X").is_err());
    }

    #[tokio::test]
    async fn transport_error_message_never_contains_api_key() {
        // Unreachable loopback port, fails before any packet leaves the host.
        let client = PolygonClient::new(&ProviderConfig {
            api_key: "SUPERSECRETKEY".into(),
            base_url: "http://127.0.0.1:9".into(),
        })
        .expect("build client");

        let err = client.previous_close("AAPL").await.unwrap_err();
        let msg = err.to_string();
        assert!(!msg.contains("SUPERSECRETKEY"), "leaked key in: {msg}");
        assert!(!msg.contains("apiKey"), "leaked query string in: {msg}");

        let api_err_msg = crate::error::ApiError::from(err).to_string();
        assert!(!api_err_msg.contains("SUPERSECRETKEY"));
    }
}

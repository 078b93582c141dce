use crate::utils::error::{Result, SkywatchError};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// Thin JSON-over-HTTP client for the provider feeds.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("skywatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch_json(&self, url: &str) -> Result<Value> {
        tracing::debug!("Making API request to: {}", url);
        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {} for {}", status, url);
        if !status.is_success() {
            return Err(SkywatchError::ProcessingError {
                message: format!("http {} for {}", status, url),
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// Like [`fetch_json`](Self::fetch_json) but never fails: any transport, status or
    /// decoding error is logged and replaced by `fallback`.
    pub async fn fetch_json_or(&self, feed: &str, url: &str, fallback: Value) -> Value {
        match self.fetch_json(url).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("⚠️ {} feed unavailable, continuing without it: {}", feed, e);
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_json_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/kp.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([["time_tag", "kp"], ["2025-01-01 00:00:00", "2.33"]]));
        });

        let client = FeedClient::new(5).unwrap();
        let value = client.fetch_json(&server.url("/kp.json")).await.unwrap();

        mock.assert();
        assert_eq!(value[1][1], "2.33");
    }

    #[tokio::test]
    async fn test_fetch_json_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/down");
            then.status(503);
        });

        let client = FeedClient::new(5).unwrap();
        let err = client.fetch_json(&server.url("/down")).await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_fetch_json_or_substitutes_fallback() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/garbage");
            then.status(200).body("<html>maintenance</html>");
        });

        let client = FeedClient::new(5).unwrap();
        let value = client
            .fetch_json_or("plasma", &server.url("/garbage"), json!([]))
            .await;
        assert_eq!(value, json!([]));
    }
}

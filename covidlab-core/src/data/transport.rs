//! HTTP transport seam.
//!
//! The `HttpTransport` trait abstracts the wire so the fetch policy can
//! be exercised against stub transports in tests. The cache-fallback
//! layer sits above this trait — transports know nothing about the cache.

use super::error::DataError;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

/// A single HTTP GET returning the raw response body.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetch the body at `url`. Non-success statuses are errors.
    async fn get(&self, url: &Url) -> Result<Vec<u8>, DataError>;
}

/// Production transport backed by a shared reqwest client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, DataError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        Ok(body.to_vec())
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP transport seam
//!
//! The session only needs "GET this URL, give me status and body". Keeping
//! that behind a trait lets tests count and script network calls.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::types::SearchError;

/// Raw response of one GET
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Full response body
    pub body: Bytes,
}

impl TransportResponse {
    /// Build a response from a status and body
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status signals quota exhaustion
    pub fn is_rate_limited(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS.as_u16()
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing search API requests
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Perform one GET and return the status and body
    ///
    /// Non-success statuses are returned as responses, not errors. Errors are
    /// reserved for failures where no usable response exists.
    async fn get(&self, url: &Url) -> Result<TransportResponse, SearchError>;

    /// Transport name for logging
    fn name(&self) -> &'static str {
        "http"
    }
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    timeout_ms: u64,
}

impl HttpTransport {
    /// Create a transport with the given request timeout
    pub fn new(timeout_ms: u64) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(concat!("google-search-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// 429 never lands here: statuses are returned as responses
    fn map_error(&self, e: reqwest::Error) -> SearchError {
        if e.is_timeout() {
            SearchError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            SearchError::Transport {
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, SearchError> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        debug!(status, bytes = body.len(), "Search API responded");

        Ok(TransportResponse { status, body })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

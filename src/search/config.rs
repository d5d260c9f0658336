// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the search session engine

use std::env;
use url::Url;

use super::types::SearchError;

/// Custom Search JSON API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://customsearch.googleapis.com/customsearch/v1";

/// Page opened when the user launches a full search
pub const DEFAULT_LAUNCH_URL: &str = "https://www.google.com/search";

/// Items the API returns per page; a smaller cache cap would evict hits
/// from the very page that is being delivered
pub const API_PAGE_SIZE: usize = 10;

/// Shortest id length that keeps collisions negligible (62^32 > 10^57)
pub const MIN_ID_LENGTH: usize = 32;

/// Configuration for the search session engine
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Remote search API endpoint
    pub endpoint: String,
    /// Base URL for full searches opened in the browser
    pub launch_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Cap on cached result records (None = unbounded)
    pub max_cached_results: Option<usize>,
    /// Length of generated result ids
    pub id_length: usize,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: env::var("GOOGLE_SEARCH_ENDPOINT").unwrap_or(defaults.endpoint),
            launch_url: env::var("GOOGLE_SEARCH_LAUNCH_URL").unwrap_or(defaults.launch_url),
            request_timeout_ms: env::var("GOOGLE_SEARCH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            max_cached_results: env::var("GOOGLE_SEARCH_MAX_CACHED_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok()),
            id_length: env::var("GOOGLE_SEARCH_ID_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.id_length),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SearchError> {
        self.endpoint_url()?;
        self.launch_base()?;
        if self.request_timeout_ms == 0 {
            return Err(invalid("request timeout must be greater than 0"));
        }
        if let Some(max) = self.max_cached_results {
            if max < API_PAGE_SIZE {
                return Err(invalid(format!(
                    "result cache cap must hold at least one page ({}), got {}",
                    API_PAGE_SIZE, max
                )));
            }
        }
        if self.id_length < MIN_ID_LENGTH {
            return Err(invalid(format!(
                "id length must be at least {}, got {}",
                MIN_ID_LENGTH, self.id_length
            )));
        }
        Ok(())
    }

    /// Parsed API endpoint
    pub fn endpoint_url(&self) -> Result<Url, SearchError> {
        parse_http_url("endpoint", &self.endpoint)
    }

    /// Parsed launch base URL
    pub fn launch_base(&self) -> Result<Url, SearchError> {
        parse_http_url("launch URL", &self.launch_url)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            launch_url: DEFAULT_LAUNCH_URL.to_string(),
            request_timeout_ms: 10_000,
            max_cached_results: None,
            id_length: MIN_ID_LENGTH,
        }
    }
}

fn parse_http_url(what: &str, raw: &str) -> Result<Url, SearchError> {
    let url = Url::parse(raw).map_err(|e| invalid(format!("{} '{}': {}", what, raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("{} must be http(s), got '{}'", what, other))),
    }
}

fn invalid(reason: impl Into<String>) -> SearchError {
    SearchError::InvalidConfig {
        reason: reason.into(),
    }
}

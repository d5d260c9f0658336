// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the search session engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Id of the pseudo-result returned once the remote quota is exhausted.
///
/// Contains a `-`, so it can never collide with a generated (alphanumeric) id.
pub const RATE_LIMITED_ID: &str = "too-many-requests";

/// Display text of the rate-limit pseudo-result
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests.";

/// A single search hit fetched from the remote API
///
/// Immutable once registered in the result store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// Synthesized identifier
    pub id: String,
    /// Title shown in the result row
    pub title: String,
    /// Absolute URI opened on activation, exactly as the API sent it
    pub link: String,
    /// Thumbnail image, absent when the API omitted or mangled it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_uri: Option<String>,
    /// Short text excerpt, if the API supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Human readable host name, if the API supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_link: Option<String>,
}

/// Metadata the host needs to render one result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMeta {
    /// Result id as returned by the session
    pub id: String,
    /// Display name (the record title, or the rate-limit message)
    pub name: String,
    /// Secondary line; the link for real hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon to show next to the row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Whether clicking the row should do anything
    pub activatable: bool,
}

impl ResultMeta {
    /// Meta for the inert rate-limit row
    pub fn rate_limited() -> Self {
        Self {
            id: RATE_LIMITED_ID.to_string(),
            name: RATE_LIMITED_MESSAGE.to_string(),
            description: None,
            thumbnail: None,
            activatable: false,
        }
    }

    /// Meta for a stored search hit
    pub fn from_record(record: &ResultRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.title.clone(),
            description: Some(record.link.clone()),
            thumbnail: record.thumbnail_uri.clone(),
            activatable: true,
        }
    }

    /// Whether this is the rate-limit pseudo-result
    pub fn is_rate_limited(&self) -> bool {
        self.id == RATE_LIMITED_ID
    }
}

/// Terminal state of one search operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Response parsed and committed
    Delivered,
    /// Quota exhausted (now or earlier in the session)
    RateLimited,
    /// Caller signalled the cancellation token
    Cancelled,
    /// Any other transport, status or parse error
    Failed,
}

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Remote quota exhausted (HTTP 429)
    #[error("Rate limited by the search API")]
    RateLimited,

    /// Caller cancelled the operation
    #[error("Search cancelled")]
    Cancelled,

    /// Request timed out
    #[error("Search timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Network or DNS level failure
    #[error("Transport error: {message}")]
    Transport {
        /// Underlying error text
        message: String,
    },

    /// Non-success status other than 429
    #[error("Search API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Body could not be interpreted as a result list
    #[error("Invalid search response: {reason}")]
    InvalidResponse {
        /// What was wrong with the body
        reason: String,
    },

    /// A required credential is empty
    #[error("Setting '{setting}' is not configured")]
    MissingCredentials {
        /// Name of the empty setting
        setting: String,
    },

    /// Id was never issued, or has been evicted
    #[error("Unknown result id: {id}")]
    UnknownId {
        /// The offending id
        id: String,
    },

    /// Configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which value was rejected
        reason: String,
    },

    /// The "open URI" action failed
    #[error("Failed to open {uri}: {message}")]
    Launch {
        /// URI that could not be opened
        uri: String,
        /// Underlying error text
        message: String,
    },

    /// Settings could not be read, written or updated
    #[error("Settings error: {message}")]
    Settings {
        /// Underlying error text
        message: String,
    },
}

impl SearchError {
    /// Whether the caller cancelled the operation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }

    /// Whether the error is a caller contract violation
    pub fn is_unknown_id(&self) -> bool {
        matches!(self, SearchError::UnknownId { .. })
    }
}

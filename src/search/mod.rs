// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search session engine
//!
//! Turns free-text search terms into Google Custom Search queries and hands
//! the host opaque result ids it can render, refine, truncate and activate.
//!
//! Key features:
//! - Cancellable queries (`tokio_util` cancellation tokens)
//! - Sticky rate-limit state surfaced as a single informational row
//! - Insertion-ordered result cache keyed by random ids
//! - Live credentials that can change while the provider runs

pub mod activation;
pub mod config;
pub mod google;
pub mod id_generator;
pub mod provider;
pub mod rate_limiter;
pub mod session;
pub mod settings;
pub mod store;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::SearchConfig;
pub use provider::{CommandLauncher, GoogleSearchProvider, SearchProvider, UriLauncher};
pub use session::{truncate, SearchSession, SessionState, SessionStats};
pub use settings::{Credentials, SettingsStore};
pub use transport::{HttpTransport, SearchTransport, TransportResponse};
pub use types::{
    ResultMeta, ResultRecord, SearchError, SearchOutcome, RATE_LIMITED_ID, RATE_LIMITED_MESSAGE,
};

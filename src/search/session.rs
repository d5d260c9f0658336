// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search session orchestration
//!
//! A session lives as long as its provider. It turns search terms into
//! remote queries, registers the hits under fresh ids and remembers whether
//! the API quota has been exhausted.
//!
//! ```text
//! Idle ──start_search──> Querying ──┬─> Delivered   (ids)
//!                                   ├─> RateLimited (sentinel id, sticky)
//!                                   ├─> Cancelled   (SearchError::Cancelled)
//!                                   └─> Failed      (other SearchError)
//! ```
//!
//! The store lock is only taken after the response has been received, never
//! across an await, so overlapping searches cannot see each other's partial
//! results.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

use super::activation;
use super::config::SearchConfig;
use super::google::{build_query_url, parse_results};
use super::id_generator::IdGenerator;
use super::rate_limiter::RateLimitState;
use super::settings::{Credentials, SettingsStore};
use super::store::ResultStore;
use super::transport::{HttpTransport, SearchTransport};
use super::types::{ResultMeta, ResultRecord, SearchError, SearchOutcome, RATE_LIMITED_ID};

/// Coarse session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No request outstanding
    Idle,
    /// At least one remote call is in flight
    Querying {
        /// Number of overlapping requests
        in_flight: usize,
    },
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Searches that delivered a result list
    pub delivered: u64,
    /// Searches answered with the rate-limit sentinel
    pub rate_limited: u64,
    /// Searches cancelled by the caller
    pub cancelled: u64,
    /// Searches that failed
    pub failed: u64,
    /// Requests handed to the transport
    pub network_calls: u64,
    /// Records currently cached
    pub cached_results: usize,
    /// Records dropped by the cache cap
    pub evicted: u64,
}

/// What a successful run produced before it is reported to the caller
enum Reply {
    Hits(Vec<String>),
    RateLimited,
}

/// Orchestrates searches for one provider instance
pub struct SearchSession {
    endpoint: Url,
    launch_base: Url,
    credentials: watch::Receiver<Credentials>,
    transport: Arc<dyn SearchTransport>,
    store: RwLock<ResultStore>,
    rate_limit: RateLimitState,
    ids: IdGenerator,
    in_flight: AtomicUsize,
    counters: Counters,
}

#[derive(Default)]
struct Counters {
    delivered: AtomicU64,
    rate_limited: AtomicU64,
    cancelled: AtomicU64,
    failed: AtomicU64,
    network_calls: AtomicU64,
}

/// Decrements the in-flight count however the query ends
struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SearchSession {
    /// Create a session from configuration, live credentials and a transport
    pub fn new(
        config: SearchConfig,
        credentials: watch::Receiver<Credentials>,
        transport: Arc<dyn SearchTransport>,
    ) -> Result<Self, SearchError> {
        config.validate()?;

        let store = match config.max_cached_results {
            Some(max) => ResultStore::with_capacity_limit(max),
            None => ResultStore::new(),
        };

        debug!(
            transport = transport.name(),
            max_cached_results = ?config.max_cached_results,
            "Search session created"
        );

        Ok(Self {
            endpoint: config.endpoint_url()?,
            launch_base: config.launch_base()?,
            credentials,
            transport,
            store: RwLock::new(store),
            rate_limit: RateLimitState::new(),
            ids: IdGenerator::new(config.id_length),
            in_flight: AtomicUsize::new(0),
            counters: Counters::default(),
        })
    }

    /// Create a session talking to the real API over HTTP
    pub fn with_http(config: SearchConfig, settings: &SettingsStore) -> Result<Self, SearchError> {
        let transport = HttpTransport::new(config.request_timeout_ms)?;
        Self::new(config, settings.subscribe(), Arc::new(transport))
    }

    /// Start a new search
    ///
    /// Resolves to the ids of the fresh hits, in API order, or to the single
    /// rate-limit sentinel once the quota is exhausted.
    pub async fn start_search<S: AsRef<str>>(
        &self,
        terms: &[S],
        token: &CancellationToken,
    ) -> Result<Vec<String>, SearchError> {
        let start = Instant::now();
        let result = self.run_search(terms, token).await;

        let outcome = match &result {
            Ok(Reply::Hits(_)) => SearchOutcome::Delivered,
            Ok(Reply::RateLimited) => SearchOutcome::RateLimited,
            Err(SearchError::Cancelled) => SearchOutcome::Cancelled,
            Err(_) => SearchOutcome::Failed,
        };
        self.record_outcome(outcome);

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(Reply::Hits(ids)) => {
                info!(results = ids.len(), elapsed_ms, "Search complete");
                Ok(ids)
            }
            Ok(Reply::RateLimited) => Ok(vec![RATE_LIMITED_ID.to_string()]),
            Err(e) => {
                if e.is_cancelled() {
                    debug!(elapsed_ms, "Search cancelled");
                } else {
                    warn!(error = %e, elapsed_ms, "Search failed");
                }
                Err(e)
            }
        }
    }

    /// Refine a previous search with new terms
    ///
    /// The API cannot narrow an earlier query, so this re-runs the search.
    pub async fn refine_search<S: AsRef<str>>(
        &self,
        previous: &[String],
        terms: &[S],
        token: &CancellationToken,
    ) -> Result<Vec<String>, SearchError> {
        if token.is_cancelled() {
            self.record_outcome(SearchOutcome::Cancelled);
            return Err(SearchError::Cancelled);
        }
        debug!(previous = previous.len(), "Refining search as a new query");
        self.start_search(terms, token).await
    }

    /// Keep at most `max_results` ids
    pub fn truncate(&self, ids: &[String], max_results: usize) -> Vec<String> {
        truncate(ids, max_results)
    }

    /// Resolve display metadata for `ids`, in the same order
    pub async fn resolve_metadata(
        &self,
        ids: &[String],
        token: &CancellationToken,
    ) -> Result<Vec<ResultMeta>, SearchError> {
        let store = self.read_store();
        let mut metas = Vec::with_capacity(ids.len());

        for id in ids {
            if token.is_cancelled() {
                return Err(SearchError::Cancelled);
            }

            if id == RATE_LIMITED_ID {
                metas.push(ResultMeta::rate_limited());
                continue;
            }

            match store.get(id) {
                Some(record) => metas.push(ResultMeta::from_record(record)),
                None => {
                    error!(id = %id, "Metadata requested for unknown result id");
                    return Err(SearchError::UnknownId { id: id.clone() });
                }
            }
        }

        Ok(metas)
    }

    /// Link to open when the result `id` is activated
    pub fn resolve_activation_uri(&self, id: &str) -> Result<String, SearchError> {
        activation::resolve_activation_uri(&self.read_store(), id)
    }

    /// Full-search URI for `terms`
    pub fn build_launch_uri<S: AsRef<str>>(&self, terms: &[S]) -> Url {
        activation::build_launch_uri(&self.launch_base, terms)
    }

    /// Copy of the stored record for `id`
    pub fn record(&self, id: &str) -> Option<ResultRecord> {
        self.read_store().get(id).cloned()
    }

    /// Whether the quota has been exhausted for this session
    pub fn is_rate_limited(&self) -> bool {
        self.rate_limit.is_tripped()
    }

    /// Current coarse state
    pub fn state(&self) -> SessionState {
        match self.in_flight.load(Ordering::SeqCst) {
            0 => SessionState::Idle,
            in_flight => SessionState::Querying { in_flight },
        }
    }

    /// Get session statistics
    pub fn stats(&self) -> SessionStats {
        let store = self.read_store().stats();
        SessionStats {
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            rate_limited: self.counters.rate_limited.load(Ordering::Relaxed),
            cancelled: self.counters.cancelled.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            network_calls: self.counters.network_calls.load(Ordering::Relaxed),
            cached_results: store.total,
            evicted: store.evicted,
        }
    }

    async fn run_search<S: AsRef<str>>(
        &self,
        terms: &[S],
        token: &CancellationToken,
    ) -> Result<Reply, SearchError> {
        if token.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        if self.rate_limit.is_tripped() {
            debug!("Quota exhausted earlier in this session, skipping request");
            return Ok(Reply::RateLimited);
        }

        // Always the latest value, never a snapshot taken at construction
        let credentials = self.credentials.borrow().clone();
        if let Some(setting) = credentials.missing() {
            return Err(SearchError::MissingCredentials {
                setting: setting.to_string(),
            });
        }

        let url = build_query_url(&self.endpoint, &credentials, terms)?;

        let _guard = InFlightGuard::enter(&self.in_flight);
        self.counters.network_calls.fetch_add(1, Ordering::Relaxed);
        debug!(terms = terms.len(), "Sending search request");

        let response = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(SearchError::Cancelled),
            response = self.transport.get(&url) => response,
        };

        let response = match response {
            Ok(response) if response.is_rate_limited() => return self.quota_exhausted(token),
            Ok(response) => response,
            Err(SearchError::RateLimited) => return self.quota_exhausted(token),
            Err(e) => return Err(e),
        };

        if token.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        if !response.is_success() {
            let message = String::from_utf8_lossy(&response.body)
                .chars()
                .take(200)
                .collect();
            return Err(SearchError::ApiError {
                status: response.status,
                message,
            });
        }

        let records = parse_results(&response.body, &self.ids)?;

        let mut store = self.write_store();
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match store.insert(record) {
                Ok(()) => ids.push(id),
                Err(e) => warn!(error = %e, "Dropping result with colliding id"),
            }
        }
        // Every id handed back must still resolve
        ids.retain(|id| store.contains(id));

        Ok(Reply::Hits(ids))
    }

    fn quota_exhausted(&self, token: &CancellationToken) -> Result<Reply, SearchError> {
        if self.rate_limit.trip() {
            warn!("Search API quota exhausted, further searches are disabled for this session");
        }
        // The quota signal is real even if nobody is waiting for the answer
        if token.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        Ok(Reply::RateLimited)
    }

    fn record_outcome(&self, outcome: SearchOutcome) {
        let counter = match outcome {
            SearchOutcome::Delivered => &self.counters.delivered,
            SearchOutcome::RateLimited => &self.counters.rate_limited,
            SearchOutcome::Cancelled => &self.counters.cancelled,
            SearchOutcome::Failed => &self.counters.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn read_store(&self) -> RwLockReadGuard<'_, ResultStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, ResultStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keep at most `max_results` ids, preserving order
pub fn truncate(ids: &[String], max_results: usize) -> Vec<String> {
    if ids.len() <= max_results {
        return ids.to_vec();
    }
    ids[..max_results].to_vec()
}

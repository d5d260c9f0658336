// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search provider trait definition
//!
//! A host search surface drives providers through this trait: it asks for
//! result ids, refines and truncates them, fetches row metadata, and finally
//! activates a row or launches a full search in the browser.

use async_trait::async_trait;
use std::process::Command;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::session::SearchSession;
use super::types::{ResultMeta, SearchError, RATE_LIMITED_ID};

/// The opaque "open URI" action
#[cfg_attr(test, mockall::automock)]
pub trait UriLauncher: Send + Sync {
    /// Open `uri` with the user's default handler
    fn open(&self, uri: &str) -> Result<(), SearchError>;
}

/// Launcher that hands the URI to an external program (`xdg-open` by default)
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: String,
}

impl CommandLauncher {
    /// Launch URIs with `program <uri>`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Platform default opener
    pub fn system_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("open")
        } else if cfg!(target_os = "windows") {
            Self::new("explorer")
        } else {
            Self::new("xdg-open")
        }
    }

    /// Program used to open URIs
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl UriLauncher for CommandLauncher {
    fn open(&self, uri: &str) -> Result<(), SearchError> {
        debug!(program = %self.program, uri = %uri, "Opening URI");
        Command::new(&self.program)
            .arg(uri)
            .spawn()
            .map(|_| ())
            .map_err(|e| SearchError::Launch {
                uri: uri.to_string(),
                message: e.to_string(),
            })
    }
}

/// How the provider presents itself to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Name shown above the provider's results
    pub name: String,
    /// Provider id
    pub id: String,
    /// Whether the host should list the provider
    pub should_show: bool,
}

/// Trait for implementing host search providers
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Unique provider id
    fn id(&self) -> &str;

    /// Presentation info
    fn app_info(&self) -> AppInfo;

    /// Whether `launch_search` is supported
    fn can_launch_search(&self) -> bool;

    /// Start a new search and return result ids
    async fn get_initial_result_set(
        &self,
        terms: &[String],
        token: &CancellationToken,
    ) -> Result<Vec<String>, SearchError>;

    /// Refine `previous` with expanded `terms`
    async fn get_subsearch_result_set(
        &self,
        previous: &[String],
        terms: &[String],
        token: &CancellationToken,
    ) -> Result<Vec<String>, SearchError>;

    /// Keep at most `max_results` ids
    fn filter_results(&self, ids: &[String], max_results: usize) -> Vec<String>;

    /// Row metadata for `ids`
    async fn get_result_metas(
        &self,
        ids: &[String],
        token: &CancellationToken,
    ) -> Result<Vec<ResultMeta>, SearchError>;

    /// Open the result `id`
    fn activate_result(&self, id: &str, terms: &[String]) -> Result<(), SearchError>;

    /// Open a full search for `terms`
    fn launch_search(&self, terms: &[String]) -> Result<(), SearchError>;
}

/// Google Custom Search provider
pub struct GoogleSearchProvider {
    id: String,
    session: SearchSession,
    launcher: Arc<dyn UriLauncher>,
}

impl GoogleSearchProvider {
    /// Create a provider around a session and a URI launcher
    pub fn new(
        id: impl Into<String>,
        session: SearchSession,
        launcher: Arc<dyn UriLauncher>,
    ) -> Self {
        Self {
            id: id.into(),
            session,
            launcher,
        }
    }

    /// Underlying session
    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Failures other than cancellation show up as an empty result set
    fn soften(result: Result<Vec<String>, SearchError>) -> Result<Vec<String>, SearchError> {
        match result {
            Err(e) if !e.is_cancelled() => {
                warn!(error = %e, "Search failed, showing no results");
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn app_info(&self) -> AppInfo {
        AppInfo {
            name: "Google Search".to_string(),
            id: self.id.clone(),
            should_show: true,
        }
    }

    fn can_launch_search(&self) -> bool {
        true
    }

    async fn get_initial_result_set(
        &self,
        terms: &[String],
        token: &CancellationToken,
    ) -> Result<Vec<String>, SearchError> {
        Self::soften(self.session.start_search(terms, token).await)
    }

    async fn get_subsearch_result_set(
        &self,
        previous: &[String],
        terms: &[String],
        token: &CancellationToken,
    ) -> Result<Vec<String>, SearchError> {
        Self::soften(self.session.refine_search(previous, terms, token).await)
    }

    fn filter_results(&self, ids: &[String], max_results: usize) -> Vec<String> {
        self.session.truncate(ids, max_results)
    }

    async fn get_result_metas(
        &self,
        ids: &[String],
        token: &CancellationToken,
    ) -> Result<Vec<ResultMeta>, SearchError> {
        self.session.resolve_metadata(ids, token).await
    }

    fn activate_result(&self, id: &str, _terms: &[String]) -> Result<(), SearchError> {
        // The rate-limit row is informational only
        if id == RATE_LIMITED_ID {
            debug!("Ignoring activation of the rate-limit row");
            return Ok(());
        }
        let uri = self.session.resolve_activation_uri(id)?;
        info!(uri = %uri, "Activating search result");
        self.launcher.open(&uri)
    }

    fn launch_search(&self, terms: &[String]) -> Result<(), SearchError> {
        let uri = self.session.build_launch_uri(terms);
        info!(uri = %uri, "Launching full search");
        self.launcher.open(uri.as_str())
    }
}

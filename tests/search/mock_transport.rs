// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Scripted transport shared by the session tests

use async_trait::async_trait;
use google_search_provider::search::{
    Credentials, SearchConfig, SearchError, SearchSession, SearchTransport, SettingsStore,
    TransportResponse,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Transport answering from a script, keyed by the `q` parameter when set
pub struct ScriptedTransport {
    queue: Mutex<Vec<TransportResponse>>,
    by_query: Mutex<HashMap<String, (Duration, TransportResponse)>>,
    calls: AtomicUsize,
    hang: bool,
    urls: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    /// Answer calls in order with `responses`, then with empty pages
    pub fn new(responses: Vec<TransportResponse>) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(responses),
            by_query: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            hang: false,
            urls: Mutex::new(Vec::new()),
        })
    }

    /// Never answer
    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(Vec::new()),
            by_query: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            hang: true,
            urls: Mutex::new(Vec::new()),
        })
    }

    /// Answer queries for `q` after `delay`
    pub fn respond_to(&self, q: &str, delay: Duration, response: TransportResponse) {
        self.by_query
            .lock()
            .unwrap()
            .insert(q.to_string(), (delay, response));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<Url> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTransport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.clone());

        if self.hang {
            std::future::pending::<()>().await;
        }

        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        let scripted = self.by_query.lock().unwrap().get(&q).cloned();
        if let Some((delay, response)) = scripted {
            tokio::time::sleep(delay).await;
            return Ok(response);
        }

        let mut queue = self.queue.lock().unwrap();
        if queue.is_empty() {
            Ok(TransportResponse::new(200, r#"{"items": []}"#))
        } else {
            Ok(queue.remove(0))
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn ok(body: &str) -> TransportResponse {
    TransportResponse::new(200, body.to_string())
}

pub fn status(code: u16) -> TransportResponse {
    TransportResponse::new(code, String::new())
}

pub fn settings() -> SettingsStore {
    SettingsStore::new(Credentials::new("test-key", "test-cx"))
}

pub fn session(transport: Arc<ScriptedTransport>, settings: &SettingsStore) -> SearchSession {
    SearchSession::new(SearchConfig::default(), settings.subscribe(), transport).unwrap()
}

pub fn terms(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

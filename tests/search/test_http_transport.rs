// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// HttpTransport against a local stand-in for the search API

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use google_search_provider::search::{
    Credentials, HttpTransport, SearchConfig, SearchSession, SearchTransport, SettingsStore,
    RATE_LIMITED_ID,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

async fn customsearch(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    if params.get("key").map(String::as_str) != Some("good-key") {
        return (StatusCode::BAD_REQUEST, r#"{"error": {"code": 400}}"#.to_string());
    }
    match params.get("q").map(String::as_str) {
        Some("quota") => (StatusCode::TOO_MANY_REQUESTS, String::new()),
        Some("slow") => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            (StatusCode::OK, r#"{"items": []}"#.to_string())
        }
        Some(q) => (
            StatusCode::OK,
            format!(
                r#"{{"items": [{{"title": "Result for {}", "link": "https://example.com/{}"}}]}}"#,
                q, q
            ),
        ),
        None => (StatusCode::BAD_REQUEST, String::new()),
    }
}

async fn spawn_api() -> SocketAddr {
    let app = Router::new().route("/customsearch/v1", get(customsearch));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(addr: SocketAddr, timeout_ms: u64) -> SearchConfig {
    SearchConfig {
        endpoint: format!("http://{}/customsearch/v1", addr),
        request_timeout_ms: timeout_ms,
        ..SearchConfig::default()
    }
}

#[tokio::test]
async fn test_http_search_delivers_results() {
    let addr = spawn_api().await;
    let settings = SettingsStore::new(Credentials::new("good-key", "cx-1"));
    let session = SearchSession::with_http(config(addr, 5_000), &settings).unwrap();
    let token = CancellationToken::new();

    let ids = session.start_search(&["kittens".to_string()], &token).await.unwrap();
    assert_eq!(ids.len(), 1);

    let metas = session.resolve_metadata(&ids, &token).await.unwrap();
    assert_eq!(metas[0].name, "Result for kittens");
    assert_eq!(
        session.resolve_activation_uri(&ids[0]).unwrap().as_str(),
        "https://example.com/kittens"
    );
}

#[tokio::test]
async fn test_http_429_trips_session() {
    let addr = spawn_api().await;
    let settings = SettingsStore::new(Credentials::new("good-key", "cx-1"));
    let session = SearchSession::with_http(config(addr, 5_000), &settings).unwrap();
    let token = CancellationToken::new();

    let ids = session.start_search(&["quota".to_string()], &token).await.unwrap();
    assert_eq!(ids, vec![RATE_LIMITED_ID.to_string()]);

    let ids = session.start_search(&["kittens".to_string()], &token).await.unwrap();
    assert_eq!(ids, vec![RATE_LIMITED_ID.to_string()]);
    assert_eq!(session.stats().network_calls, 1);
}

#[tokio::test]
async fn test_http_hot_swapped_key_is_used() {
    let addr = spawn_api().await;
    let settings = SettingsStore::new(Credentials::new("stale-key", "cx-1"));
    let session = SearchSession::with_http(config(addr, 5_000), &settings).unwrap();
    let token = CancellationToken::new();

    let err = session
        .start_search(&["kittens".to_string()], &token)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("400"));

    settings.set_string("api-key", "good-key").unwrap();
    let ids = session.start_search(&["kittens".to_string()], &token).await.unwrap();
    assert_eq!(ids.len(), 1);
}

#[tokio::test]
async fn test_http_timeout() {
    let addr = spawn_api().await;
    let transport = HttpTransport::new(100).unwrap();
    let url = Url::parse(&format!(
        "http://{}/customsearch/v1?cx=c&key=good-key&q=slow",
        addr
    ))
    .unwrap();

    let err = transport.get(&url).await.unwrap_err();
    assert!(err.to_string().contains("timeout"));
}

#[tokio::test]
async fn test_http_statuses_are_reported_not_raised() {
    let addr = spawn_api().await;
    let transport: Arc<dyn SearchTransport> = Arc::new(HttpTransport::new(5_000).unwrap());
    let url = Url::parse(&format!("http://{}/customsearch/v1?key=bad&q=x", addr)).unwrap();

    let response = transport.get(&url).await.unwrap();
    assert_eq!(response.status, 400);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_http_429_arrives_as_response() {
    let addr = spawn_api().await;
    let transport = HttpTransport::new(5_000).unwrap();
    let url = Url::parse(&format!("http://{}/customsearch/v1?key=good-key&q=quota", addr)).unwrap();

    let response = transport.get(&url).await.unwrap();
    assert_eq!(response.status, 429);
    assert!(response.is_rate_limited());
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Launch URIs and result activation

use google_search_provider::search::activation::{build_launch_uri, encode_terms, TERM_SEPARATOR};
use google_search_provider::search::SearchConfig;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::mock_transport::{ok, session, settings, terms, ScriptedTransport};

fn google() -> Url {
    SearchConfig::default().launch_base().unwrap()
}

fn split_terms(url: &Url) -> Vec<String> {
    url.query()
        .and_then(|q| q.strip_prefix("q="))
        .unwrap()
        .split(TERM_SEPARATOR)
        .map(|t| urlencoding::decode(t).unwrap().into_owned())
        .collect()
}

#[test]
fn test_launch_uri_reconstructs_terms() {
    let samples: Vec<Vec<String>> = vec![
        terms(&["cats"]),
        terms(&["rust", "borrow checker"]),
        terms(&["a+b", "c d", "e%f", "g&h=i"]),
        terms(&["/path?x=1#frag", "~tilde", "under_score", "dot.ted"]),
        terms(&["naïve", "Ωmega", "中文", "🦀🦀"]),
        terms(&["  spaced  ", "\ttab", "new\nline"]),
    ];

    for sample in samples {
        let url = build_launch_uri(&google(), &sample);
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("www.google.com"));
        let reparsed = Url::parse(url.as_str()).unwrap();
        assert_eq!(split_terms(&reparsed), sample);
    }
}

#[test]
fn test_launch_uri_empty_terms() {
    let url = build_launch_uri(&google(), &Vec::<String>::new());
    assert_eq!(url.as_str(), "https://www.google.com/search?q=");
}

#[test]
fn test_encoded_terms_never_contain_separator_inside_a_term() {
    let encoded = encode_terms(&["1+1", "2 + 2"]);
    assert_eq!(encoded.matches(TERM_SEPARATOR).count(), 1);
}

#[tokio::test]
async fn test_session_launch_uri_uses_configured_base() {
    let transport = ScriptedTransport::new(vec![]);
    let settings = settings();
    let session = session(transport.clone(), &settings);

    let url = session.build_launch_uri(&terms(&["weather", "today"]));
    assert_eq!(url.as_str(), "https://www.google.com/search?q=weather+today");
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_activation_of_each_result() {
    let body = r#"{"items": [
        {"title": "One", "link": "https://one.example/page?id=1"},
        {"title": "Two", "link": "https://two.example/"}
    ]}"#;
    let transport = ScriptedTransport::new(vec![ok(body)]);
    let settings = settings();
    let session = session(transport, &settings);

    let ids = session
        .start_search(&terms(&["n"]), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        session.resolve_activation_uri(&ids[0]).unwrap().as_str(),
        "https://one.example/page?id=1"
    );
    assert_eq!(
        session.resolve_activation_uri(&ids[1]).unwrap().as_str(),
        "https://two.example/"
    );
}

#[test]
fn test_activation_of_unknown_id_fails_loudly() {
    let transport = ScriptedTransport::new(vec![]);
    let settings = settings();
    let session = session(transport, &settings);

    let err = session.resolve_activation_uri("never-issued").unwrap_err();
    assert!(err.is_unknown_id());
    assert!(err.to_string().contains("never-issued"));
}

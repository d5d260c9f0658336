// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Custom Search JSON API wire contract
//!
//! Request: `GET <endpoint>?cx=..&key=..&q=term1+term2`.
//! Response: a JSON object whose optional `items` array holds the hits.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::activation::encode_terms;
use super::id_generator::IdGenerator;
use super::settings::Credentials;
use super::types::{ResultRecord, SearchError};

/// Build the request URL for `terms` against `endpoint`
pub fn build_query_url<S: AsRef<str>>(
    endpoint: &Url,
    credentials: &Credentials,
    terms: &[S],
) -> Result<Url, SearchError> {
    let mut url = endpoint.clone();
    url.set_query(Some(&format!(
        "cx={}&key={}&q={}",
        urlencoding::encode(&credentials.cx),
        urlencoding::encode(&credentials.api_key),
        encode_terms(terms)
    )));

    // Reparse so a broken endpoint surfaces here rather than in the transport
    Url::parse(url.as_str()).map_err(|e| SearchError::InvalidConfig {
        reason: format!("search URL: {}", e),
    })
}

/// Parse a response body into result records
///
/// Individual items that lack a title or a valid absolute link are skipped;
/// only a body that is not a JSON object (or whose `items` is not an array)
/// fails the whole response.
pub fn parse_results(body: &[u8], ids: &IdGenerator) -> Result<Vec<ResultRecord>, SearchError> {
    let json: Value = serde_json::from_slice(body).map_err(|e| SearchError::InvalidResponse {
        reason: format!("JSON parse error: {}", e),
    })?;

    let object = json.as_object().ok_or_else(|| SearchError::InvalidResponse {
        reason: "response body is not a JSON object".to_string(),
    })?;

    let items = match object.get("items") {
        // The API omits `items` entirely when nothing matched
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(SearchError::InvalidResponse {
                reason: "`items` is not an array".to_string(),
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match parse_item(item) {
            Some(parsed) => records.push(ResultRecord {
                id: ids.next_id(),
                title: parsed.title,
                link: parsed.link,
                thumbnail_uri: parsed.thumbnail,
                snippet: parsed.snippet,
                display_link: parsed.display_link,
            }),
            None => debug!(index, "Skipping malformed search item"),
        }
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleItem {
    title: String,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    display_link: Option<String>,
}

struct ParsedItem {
    title: String,
    link: String,
    thumbnail: Option<String>,
    snippet: Option<String>,
    display_link: Option<String>,
}

fn parse_item(item: &Value) -> Option<ParsedItem> {
    let raw = GoogleItem::deserialize(item).ok()?;
    // Only checked for being absolute; the link is kept byte for byte
    Url::parse(&raw.link).ok()?;
    let thumbnail = item
        .pointer("/pagemap/cse_thumbnail/0/src")
        .and_then(Value::as_str)
        .filter(|src| Url::parse(src).is_ok())
        .map(str::to_string);

    Some(ParsedItem {
        title: raw.title,
        link: raw.link,
        thumbnail,
        snippet: raw.snippet,
        display_link: raw.display_link,
    })
}

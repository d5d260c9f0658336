// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Turning result ids and raw terms into URIs the host can open

use tracing::error;
use url::Url;

use super::store::ResultStore;
use super::types::SearchError;

/// Separator placed between encoded terms in a query string
pub const TERM_SEPARATOR: char = '+';

/// Percent-encode each term and join them with `+`
///
/// Everything but `A-Z a-z 0-9 - _ . ~` is escaped, so a literal `+` or space
/// inside a term can never be confused with the separator.
pub fn encode_terms<S: AsRef<str>>(terms: &[S]) -> String {
    terms
        .iter()
        .map(|t| urlencoding::encode(t.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(&TERM_SEPARATOR.to_string())
}

/// Resolve a result id to the link it should open
///
/// Passing an id that was never issued (or was evicted, or is the rate-limit
/// marker) is a caller bug and is reported as `UnknownId`.
pub fn resolve_activation_uri(store: &ResultStore, id: &str) -> Result<String, SearchError> {
    match store.get(id) {
        Some(record) => Ok(record.link.clone()),
        None => {
            error!(id = %id, "Activation requested for unknown result id");
            Err(SearchError::UnknownId { id: id.to_string() })
        }
    }
}

/// Build the full-search URI for `terms` on top of `base`
///
/// Any query already present on `base` is replaced. An empty term list
/// yields an empty `q`.
pub fn build_launch_uri<S: AsRef<str>>(base: &Url, terms: &[S]) -> Url {
    let mut url = base.clone();
    url.set_query(Some(&format!("q={}", encode_terms(terms))));
    url
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Google Search provider

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "custom-search-json-api",
    "cancellable-queries",
    "sticky-rate-limit",
    "live-credentials",
    "result-thumbnails",
    "fifo-result-cap",
];

/// Get version information as a formatted string
pub fn get_version_string() -> String {
    format!("google-search-provider {} ({})", VERSION_NUMBER, FEATURES.join(", "))
}

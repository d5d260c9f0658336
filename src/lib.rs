// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod search;
pub mod version;

// Re-export main types
pub use search::{
    CommandLauncher, Credentials, GoogleSearchProvider, ResultMeta, ResultRecord, SearchConfig,
    SearchError, SearchProvider, SearchSession, SettingsStore, UriLauncher,
};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Live, observable API credentials
//!
//! The `api-key` and `cx` settings may change while a provider is running.
//! Sessions hold a `watch::Receiver` and read the current value whenever
//! they build a request, so an edit takes effect on the next search.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use tokio::sync::watch;
use tracing::{debug, info};

use super::types::SearchError;

/// Setting name of the API key
pub const API_KEY: &str = "api-key";

/// Setting name of the programmable search engine id
pub const CX: &str = "cx";

/// Credentials for the Custom Search JSON API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// API key
    #[serde(rename = "api-key", default)]
    pub api_key: String,
    /// Search context id
    #[serde(default)]
    pub cx: String,
}

impl Credentials {
    /// Create credentials from a key and context id
    pub fn new(api_key: impl Into<String>, cx: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            cx: cx.into(),
        }
    }

    /// Return the name of the first empty setting, if any
    pub fn missing(&self) -> Option<&'static str> {
        if self.api_key.trim().is_empty() {
            Some(API_KEY)
        } else if self.cx.trim().is_empty() {
            Some(CX)
        } else {
            None
        }
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut String, SearchError> {
        match name {
            API_KEY => Ok(&mut self.api_key),
            CX => Ok(&mut self.cx),
            other => Err(unknown_setting(other)),
        }
    }

    fn field(&self, name: &str) -> Result<&str, SearchError> {
        match name {
            API_KEY => Ok(&self.api_key),
            CX => Ok(&self.cx),
            other => Err(unknown_setting(other)),
        }
    }
}

type ChangeCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Store for the two credential settings with change notification
///
/// Callbacks run synchronously inside `set_string` and must not modify the
/// store themselves.
pub struct SettingsStore {
    current: watch::Sender<Credentials>,
    callbacks: RwLock<Vec<(String, ChangeCallback)>>,
}

impl SettingsStore {
    /// Create a store holding `credentials`
    pub fn new(credentials: Credentials) -> Self {
        let (current, _) = watch::channel(credentials);
        Self {
            current,
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Load settings from a TOML file, then apply `GOOGLE_API_KEY` and
    /// `GOOGLE_CX` overrides
    ///
    /// A missing file is treated as empty settings.
    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let mut credentials = read_file(path)?;
        apply_env(&mut credentials);
        Ok(Self::new(credentials))
    }

    /// Load settings from a TOML file only, ignoring the environment
    pub fn load_file(path: &Path) -> Result<Self, SearchError> {
        Ok(Self::new(read_file(path)?))
    }

    /// Write the current settings to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), SearchError> {
        let raw = toml::to_string(&self.credentials()).map_err(|e| settings_error(path, e))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| settings_error(path, e))?;
            }
        }
        fs::write(path, raw).map_err(|e| settings_error(path, e))?;
        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Snapshot of the current credentials
    pub fn credentials(&self) -> Credentials {
        self.current.borrow().clone()
    }

    /// Read one setting by name
    pub fn get_string(&self, name: &str) -> Result<String, SearchError> {
        self.current.borrow().field(name).map(str::to_string)
    }

    /// Update one setting and notify subscribers if it changed
    pub fn set_string(&self, name: &str, value: &str) -> Result<(), SearchError> {
        // Validate the name before touching the channel
        Credentials::default().field(name)?;

        let changed = self.current.send_if_modified(|credentials| {
            match credentials.field_mut(name) {
                Ok(field) if field.as_str() != value => {
                    *field = value.to_string();
                    true
                }
                _ => false,
            }
        });

        if changed {
            debug!(setting = %name, "Setting changed");
            let callbacks = self
                .callbacks
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            for (watched, callback) in callbacks.iter() {
                if watched == name {
                    callback(value);
                }
            }
        }
        Ok(())
    }

    /// Register a callback invoked with the new value when `name` changes
    pub fn on_changed<F>(&self, name: &str, callback: F) -> Result<(), SearchError>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Credentials::default().field(name)?;
        self.callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name.to_string(), Box::new(callback)));
        Ok(())
    }

    /// Receiver that always observes the latest credentials
    pub fn subscribe(&self) -> watch::Receiver<Credentials> {
        self.current.subscribe()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Credentials::default())
    }
}

fn read_file(path: &Path) -> Result<Credentials, SearchError> {
    if !path.exists() {
        debug!(path = %path.display(), "Settings file not found, starting empty");
        return Ok(Credentials::default());
    }
    let raw = fs::read_to_string(path).map_err(|e| settings_error(path, e))?;
    toml::from_str(&raw).map_err(|e| settings_error(path, e))
}

fn apply_env(credentials: &mut Credentials) {
    if let Ok(key) = env::var("GOOGLE_API_KEY") {
        credentials.api_key = key;
    }
    if let Ok(cx) = env::var("GOOGLE_CX") {
        credentials.cx = cx;
    }
}

fn unknown_setting(name: &str) -> SearchError {
    SearchError::Settings {
        message: format!("unknown setting '{}'", name),
    }
}

fn settings_error(path: &Path, e: impl std::fmt::Display) -> SearchError {
    SearchError::Settings {
        message: format!("{}: {}", path.display(), e),
    }
}

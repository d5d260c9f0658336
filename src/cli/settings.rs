// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::Path;

use crate::search::settings::{API_KEY, CX};
use crate::search::SettingsStore;

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the stored settings (the API key is masked)
    Show,

    /// Store one setting (`api-key` or `cx`)
    Set {
        /// Setting name
        name: String,
        /// New value
        value: String,
    },

    /// Print the settings file location
    Path,
}

/// Execute a settings subcommand
pub fn run(command: SettingsCommand, path: &Path) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            // File contents only; env overrides are not part of the stored settings
            let store = SettingsStore::load_file(path)?;
            println!("{} = {}", API_KEY, mask(&store.get_string(API_KEY)?));
            println!("{} = {}", CX, store.get_string(CX)?);
        }
        SettingsCommand::Set { name, value } => {
            let store = SettingsStore::load_file(path)?;
            store.set_string(&name, &value)?;
            store
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("✅ {} updated", name);
        }
        SettingsCommand::Path => println!("{}", path.display()),
    }
    Ok(())
}

/// Keep the first four characters of a secret
pub fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}…", visible)
}

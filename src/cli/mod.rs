// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod search;
pub mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;

/// Google Search provider CLI
#[derive(Parser, Debug)]
#[command(name = "google-search-provider")]
#[command(version)]
#[command(about = "Search the web through the Google Custom Search JSON API", long_about = None)]
pub struct Cli {
    /// Settings file holding `api-key` and `cx`
    #[arg(long, global = true, env = "GOOGLE_SEARCH_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a search and list the results
    Search(search::SearchArgs),

    /// Print (or open) the full-search URI for some terms
    Launch(search::LaunchArgs),

    /// Show or edit the stored credentials
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let settings_path = cli.settings.unwrap_or_else(default_settings_path);
    match cli.command {
        Commands::Search(args) => search::run_search(args, &settings_path).await,
        Commands::Launch(args) => search::run_launch(args, &settings_path),
        Commands::Settings(command) => settings::run(command, &settings_path),
    }
}

/// `$XDG_CONFIG_HOME/google-search-provider/settings.toml`, falling back to
/// `~/.config/...` and finally the working directory
pub fn default_settings_path() -> PathBuf {
    let config_dir = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")));

    match config_dir {
        Some(dir) => dir.join("google-search-provider").join("settings.toml"),
        None => PathBuf::from("settings.toml"),
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::search::{
    CommandLauncher, GoogleSearchProvider, ResultMeta, SearchConfig, SearchProvider,
    SearchSession, SettingsStore,
};

/// Provider id reported to hosts
pub const PROVIDER_ID: &str = "google-search-provider";

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search terms
    #[arg(required = true)]
    pub terms: Vec<String>,

    /// Maximum number of results to show
    #[arg(long, default_value_t = 10)]
    pub max: usize,

    /// Open the result at this position (1-based)
    #[arg(long)]
    pub open: Option<usize>,

    /// Print result metadata as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the launch command
#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Search terms
    pub terms: Vec<String>,

    /// Open the URI instead of only printing it
    #[arg(long)]
    pub open: bool,
}

fn build_provider(settings_path: &Path) -> Result<GoogleSearchProvider> {
    let settings = SettingsStore::load(settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;
    let config = SearchConfig::from_env();
    let session = SearchSession::with_http(config, &settings).context("creating search session")?;
    Ok(GoogleSearchProvider::new(
        PROVIDER_ID,
        session,
        Arc::new(CommandLauncher::system_default()),
    ))
}

/// Run one search and print the rows
pub async fn run_search(args: SearchArgs, settings_path: &Path) -> Result<()> {
    let provider = build_provider(settings_path)?;

    // Ctrl-C cancels the in-flight query
    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling search");
            ctrl_c.cancel();
        }
    });

    let ids = match provider.get_initial_result_set(&args.terms, &token).await {
        Ok(ids) => ids,
        Err(e) if e.is_cancelled() => {
            println!("Search cancelled");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let ids = provider.filter_results(&ids, args.max);
    let metas = provider.get_result_metas(&ids, &token).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metas)?);
    } else if metas.is_empty() {
        println!("No results");
    } else {
        for (index, meta) in metas.iter().enumerate() {
            println!("{}", render_row(index + 1, meta));
        }
    }

    if let Some(position) = args.open {
        let id = position
            .checked_sub(1)
            .and_then(|i| ids.get(i))
            .ok_or_else(|| anyhow!("no result at position {}", position))?;
        provider.activate_result(id, &args.terms)?;
    }

    let stats = provider.session().stats();
    info!(
        network_calls = stats.network_calls,
        cached_results = stats.cached_results,
        "Search session finished"
    );
    Ok(())
}

/// Print the full-search URI, opening it when asked
pub fn run_launch(args: LaunchArgs, settings_path: &Path) -> Result<()> {
    let provider = build_provider(settings_path)?;
    println!("{}", launch(&provider, &args)?);
    Ok(())
}

fn launch(provider: &GoogleSearchProvider, args: &LaunchArgs) -> Result<String> {
    let uri = provider.session().build_launch_uri(&args.terms);
    if args.open {
        provider.launch_search(&args.terms)?;
    }
    Ok(uri.to_string())
}

/// One text row per result; the rate-limit row has no link line
pub fn render_row(position: usize, meta: &ResultMeta) -> String {
    if !meta.activatable {
        return format!("⚠️  {}", meta.name);
    }

    let mut row = format!("{:>2}. {}", position, meta.name);
    if let Some(link) = &meta.description {
        row.push_str(&format!("\n    {}", link));
    }
    if let Some(thumbnail) = &meta.thumbnail {
        row.push_str(&format!("\n    🖼  {}", thumbnail));
    }
    row
}

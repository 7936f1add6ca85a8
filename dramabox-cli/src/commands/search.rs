//! Search commands - keyword search, suggestions and popular searches.

use anyhow::Result;
use clap::Args;
use dramabox_catalog::CatalogApi;
use dramabox_core::CatalogSource;
use dramabox_store::{ClientConfig, SearchSession};
use tracing::{info, warn};

use super::feed::print_listing;
use crate::Cli;

/// Arguments for the search command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search keyword.
    pub keyword: String,

    /// Number of pages to load.
    #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
}

/// Arguments for the suggest command.
#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partial keyword.
    pub keyword: String,
}

/// Runs the search command.
pub async fn run(
    args: &SearchArgs,
    api: &CatalogApi,
    config: &ClientConfig,
    cli: &Cli,
) -> Result<()> {
    let mut session = SearchSession::new(&args.keyword, config.skip_policy())?;
    info!(keyword = %session.keyword(), pages = args.pages, "Searching");

    let mut loaded = 0;
    while loaded < args.pages {
        match session.load_next(api).await {
            Ok(Some(_)) => loaded += 1,
            Ok(None) => break,
            Err(error) if loaded == 0 => return Err(error.into()),
            Err(error) => {
                warn!(error = %error, "Stopping search early");
                break;
            }
        }
    }

    if !session.skipped_pages().is_empty() {
        warn!(skipped = ?session.skipped_pages(), "Some result pages were skipped");
    }

    print_listing(
        cli,
        &format!("Search \"{}\"", session.keyword()),
        "search",
        Some(session.keyword()),
        loaded,
        session.has_more(),
        session.items(),
    )
}

/// Runs the suggest command.
pub async fn run_suggest(args: &SuggestArgs, api: &CatalogApi, cli: &Cli) -> Result<()> {
    info!(keyword = %args.keyword, "Fetching suggestions");
    let items = api.suggest(&args.keyword).await?;
    print_listing(
        cli,
        "Suggestions",
        "suggest",
        Some(args.keyword.trim()),
        1,
        false,
        &items,
    )
}

/// Runs the popular command.
pub async fn run_popular(api: &CatalogApi, cli: &Cli) -> Result<()> {
    info!("Fetching popular searches");
    let items = api.list_popular_searches().await?;
    print_listing(cli, "Popular Searches", "popular", None, 1, false, &items)
}

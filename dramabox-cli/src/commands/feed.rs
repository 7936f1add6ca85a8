//! Feed commands - for you, latest and trending listings.

use anyhow::{Result, bail};
use clap::Args;
use dramabox_catalog::CatalogApi;
use dramabox_core::{CatalogItem, FeedKind};
use dramabox_store::{CatalogFeed, FeedUpdate};
use tracing::{info, warn};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the feed commands.
#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Number of pages to load.
    #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
}

impl Default for FeedArgs {
    fn default() -> Self {
        Self { pages: 1 }
    }
}

/// Runs a feed command.
pub async fn run(kind: FeedKind, args: &FeedArgs, api: &CatalogApi, cli: &Cli) -> Result<()> {
    info!(feed = %kind, pages = args.pages, "Loading feed");

    let mut feed = CatalogFeed::new(kind);
    if let FeedUpdate::Failed(_) = feed.load_first(api).await {
        if let Some(error) = feed.last_error() {
            return Err(error.clone().into());
        }
        bail!("Failed to load {kind}");
    }

    while feed.pages_loaded() < args.pages {
        match feed.load_more(api).await {
            None => break,
            Some(FeedUpdate::Failed(failure)) => {
                // Keep what we have; later pages are best effort.
                warn!(page = feed.pages_loaded() + 1, failure = %failure, "Stopping early");
                break;
            }
            Some(_) => {}
        }
    }

    print_listing(
        cli,
        kind.display_name(),
        feed_source(kind),
        None,
        feed.pages_loaded(),
        feed.has_more(),
        feed.items(),
    )
}

/// Prints an accumulated listing in the selected format.
pub(crate) fn print_listing(
    cli: &Cli,
    title: &str,
    source: &str,
    keyword: Option<&str>,
    pages: u32,
    has_more: bool,
    items: &[CatalogItem],
) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            let formatter = if cli.quiet {
                formatter.without_summaries()
            } else {
                formatter
            };
            if !cli.quiet {
                println!("{}", formatter.format_listing_header(title, pages, has_more));
                println!("{}", "─".repeat(60));
            }
            println!("{}", formatter.format_items(items));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format_listing(source, keyword, pages, has_more, items)?
            );
        }
    }
    Ok(())
}

fn feed_source(kind: FeedKind) -> &'static str {
    match kind {
        FeedKind::ForYou => "foryou",
        FeedKind::New => "latest",
        FeedKind::Trending => "trending",
    }
}

//! Episodes command - list the chapters of a series.

use anyhow::Result;
use clap::Args;
use dramabox_catalog::CatalogApi;
use dramabox_core::CatalogSource;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the episodes command.
#[derive(Args, Debug)]
pub struct EpisodesArgs {
    /// Series identifier.
    pub series_id: String,
}

/// Runs the episodes command.
pub async fn run(args: &EpisodesArgs, api: &CatalogApi, cli: &Cli) -> Result<()> {
    info!(series = %args.series_id, "Listing episodes");
    let episodes = api.list_episodes(&args.series_id).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            if !cli.quiet {
                println!("Series {} ({} episodes)", args.series_id, episodes.len());
                println!("{}", "─".repeat(60));
            }
            if episodes.is_empty() {
                println!("No episodes published yet.");
            }
            for episode in &episodes {
                println!("{}", formatter.format_episode(episode));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_episodes(&args.series_id, &episodes)?);
        }
    }

    Ok(())
}

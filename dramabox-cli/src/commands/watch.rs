//! Watch command - resolve the stream URL of one episode.

use anyhow::Result;
use clap::Args;
use dramabox_catalog::CatalogApi;
use dramabox_core::CatalogSource;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the watch command.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Series identifier.
    pub series_id: String,

    /// Episode number, starting at 1.
    #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub episode: u32,
}

impl WatchArgs {
    /// Returns the zero-based episode index.
    pub fn episode_index(&self) -> u32 {
        self.episode.saturating_sub(1)
    }
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, api: &CatalogApi, cli: &Cli) -> Result<()> {
    info!(series = %args.series_id, episode = args.episode, "Resolving stream");
    let target = api
        .resolve_stream_target(&args.series_id, args.episode_index())
        .await?;

    match cli.format {
        OutputFormat::Text if cli.quiet => println!("{}", target.stream_url),
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_stream(&target));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_stream(&target)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_number_is_one_based() {
        let args = WatchArgs {
            series_id: "s".to_string(),
            episode: 3,
        };
        assert_eq!(args.episode_index(), 2);
    }
}

//! Relays command - probe each configured relay on its own.

use anyhow::Result;
use dramabox_catalog::CatalogApi;
use dramabox_core::FeedKind;
use futures::future::join_all;
use tracing::info;

use crate::output::{JsonFormatter, RelayProbe, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the relays command.
///
/// Every relay fetches page 1 of the for-you feed concurrently, bypassing
/// the fallback chain.
pub async fn run(api: &CatalogApi, cli: &Cli) -> Result<()> {
    let fetcher = api.fetcher();
    let path = api.scheme().feed_path(FeedKind::ForYou, 1);
    info!(relays = fetcher.len(), path = %path, "Probing relays");

    let probes: Vec<RelayProbe> = join_all(fetcher.strategy_info().into_iter().map(
        |(id, kind)| {
            let path = &path;
            async move {
                let outcome = fetcher.execute_single(&id, path).await;
                RelayProbe::from_outcome(&id, kind, &outcome)
            }
        },
    ))
    .await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            if !cli.quiet {
                println!("Relays for {}", fetcher.base_url());
                println!("{}", "─".repeat(60));
            }
            for probe in &probes {
                println!("{}", formatter.format_relay(probe));
            }
            if !cli.quiet {
                println!();
                println!(
                    "{} of {} relays reachable",
                    probes.iter().filter(|p| p.ok).count(),
                    probes.len()
                );
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_relays(&probes)?);
        }
    }

    Ok(())
}

//! Config command - manage configuration.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use dramabox_store::{ClientConfig, default_config_dir};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat, load_config};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,

    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Show configuration paths.
    Path,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Init { force } => init_config(*force, cli).await,
        ConfigAction::Path => show_paths(cli),
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;

    match cli.format {
        OutputFormat::Text => {
            println!("DramaBox Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Base URL:  {}", config.api.base_url);
            println!("Scheme:    {}", config.api.scheme);
            println!("Log level: {}", config.log_level);
            println!();
            println!("Relays (in order):");
            for relay in &config.relays {
                println!("  • {} ({}) {}", relay.id, relay.kind, relay.endpoint);
            }
            println!();
            println!("Timeout:        {}s", config.network.timeout_secs);
            println!(
                "Retries:        {} (base delay {}ms)",
                config.network.retry_attempts, config.network.retry_base_delay_ms
            );
            println!(
                "Search skips:   {} (delay {}ms)",
                config.search.max_skipped_pages, config.search.skip_delay_ms
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&config)?);
        }
    }

    Ok(())
}

async fn init_config(force: bool, cli: &Cli) -> Result<()> {
    let path = cli.config_path();

    if !force && tokio::fs::try_exists(&path).await? {
        bail!(
            "Configuration already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    ClientConfig::default().save_to(&path).await?;
    info!(path = %path.display(), "Configuration initialised");
    println!("Wrote default configuration to {}", path.display());

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_path = cli.config_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {}", config_dir.display());
            println!("Config file: {}", config_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": config_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

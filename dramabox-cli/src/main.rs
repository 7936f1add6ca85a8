// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `DramaBox` CLI - browse the short-drama catalog from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Recommendations (default command)
//! dramabox
//!
//! # Three pages of the trending ranking
//! dramabox trending --pages 3
//!
//! # Search
//! dramabox search "ceo wife" --pages 2
//!
//! # Episodes and a stream URL
//! dramabox episodes 41000102
//! dramabox watch 41000102 --episode 3
//!
//! # Which relays are up?
//! dramabox relays
//!
//! # JSON output
//! dramabox latest --format json --pretty
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dramabox_catalog::SchemeKind;
use dramabox_core::{CatalogError, FailureKind, FeedKind};
use dramabox_store::{ClientConfig, LogLevel};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, episodes, feed, relays, search, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// `DramaBox` CLI - short-drama catalog browser.
#[derive(Parser)]
#[command(name = "dramabox")]
#[command(about = "Short-drama catalog browser")]
#[command(long_about = r#"
DramaBox browses a public short-drama catalog through CORS relays.

Every request is tried through each configured relay in order until one
answers with a valid payload.

Examples:
  dramabox                       # For-you recommendations
  dramabox trending --pages 2    # Ranking, two pages
  dramabox search "revenge"      # Search
  dramabox watch 41000102        # Stream URL of episode 1
  dramabox relays                # Probe each relay
"#)]
#[command(version)]
#[command(author = "DramaBox Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'foryou'.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (defaults to the user config directory).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Override the upstream base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the upstream endpoint scheme (paged or query).
    #[arg(long, global = true)]
    pub scheme: Option<SchemeKind>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Returns the configuration file in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config_file.clone().unwrap_or_else(ClientConfig::default_path)
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Personalised recommendations (default).
    #[command(visible_alias = "home")]
    Foryou(feed::FeedArgs),

    /// Latest releases.
    #[command(visible_alias = "new")]
    Latest(feed::FeedArgs),

    /// Trending ranking.
    #[command(visible_alias = "rank")]
    Trending(feed::FeedArgs),

    /// Search the catalog.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Type-ahead suggestions for a keyword.
    Suggest(search::SuggestArgs),

    /// Popular searches.
    Popular,

    /// List the episodes of a series.
    #[command(visible_alias = "e")]
    Episodes(episodes::EpisodesArgs),

    /// Resolve the stream URL of an episode.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Probe each relay on its own.
    Relays,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Every relay failed.
    NetworkExhausted = 2,
    /// Series or episode not found.
    NotFound = 3,
    /// Episode has no playable stream.
    NoPlayableStream = 4,
    /// Invalid command-line argument.
    InvalidArgument = 5,
}

impl ExitCode {
    /// Maps a catalog failure to its exit code.
    pub fn from_failure(kind: FailureKind) -> Self {
        match kind {
            FailureKind::NetworkExhausted => Self::NetworkExhausted,
            FailureKind::NotFound => Self::NotFound,
            FailureKind::NoPlayableStream => Self::NoPlayableStream,
            FailureKind::InvalidArgument => Self::InvalidArgument,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("dramabox=debug,info")
    } else {
        EnvFilter::new(format!("dramabox={level}"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Configuration
// ============================================================================

/// Loads the configuration file and applies command-line overrides.
pub async fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::load_from(&cli.config_path()).await?;

    if let Some(base_url) = &cli.base_url {
        config.api.base_url.clone_from(base_url);
    }
    if let Some(scheme) = cli.scheme {
        config.api.scheme = scheme;
    }

    config.validate()?;
    Ok(config)
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(&cli).await {
        Ok(()) => ExitCode::Success,
        Err(e) => report_error(&e, &cli),
    };

    if code != ExitCode::Success {
        std::process::exit(code as i32);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    if let Some(Commands::Config(args)) = &cli.command {
        setup_logging(cli.verbose, cli.quiet, LogLevel::default());
        return config::run(args, cli).await;
    }

    let config = load_config(cli).await?;
    setup_logging(cli.verbose, cli.quiet, config.log_level);

    let api = config.build_api();

    match &cli.command {
        Some(Commands::Foryou(args)) => feed::run(FeedKind::ForYou, args, &api, cli).await,
        Some(Commands::Latest(args)) => feed::run(FeedKind::New, args, &api, cli).await,
        Some(Commands::Trending(args)) => feed::run(FeedKind::Trending, args, &api, cli).await,
        Some(Commands::Search(args)) => search::run(args, &api, &config, cli).await,
        Some(Commands::Suggest(args)) => search::run_suggest(args, &api, cli).await,
        Some(Commands::Popular) => search::run_popular(&api, cli).await,
        Some(Commands::Episodes(args)) => episodes::run(args, &api, cli).await,
        Some(Commands::Watch(args)) => watch::run(args, &api, cli).await,
        Some(Commands::Relays) => relays::run(&api, cli).await,
        Some(Commands::Config(_)) => Ok(()),
        None => feed::run(FeedKind::ForYou, &feed::FeedArgs::default(), &api, cli).await,
    }
}

/// Prints an error and returns the exit code for it.
///
/// Catalog failures are shown by their user-facing message; relay details
/// only appear with `--verbose`.
fn report_error(error: &anyhow::Error, cli: &Cli) -> ExitCode {
    let Some(catalog) = error.downcast_ref::<CatalogError>() else {
        if !cli.quiet {
            eprintln!("Error: {error:#}");
        }
        return ExitCode::Error;
    };

    if !cli.quiet {
        eprintln!("Error: {}", catalog.user_message());
        if cli.verbose {
            eprintln!("  {catalog}");
            if let CatalogError::NetworkExhausted { attempts, .. } = catalog {
                for attempt in attempts {
                    eprintln!("  - {attempt}");
                }
            }
        }
    }

    ExitCode::from_failure(catalog.kind())
}

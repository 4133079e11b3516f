//! `radioscout` CLI - Find internet radio stations and their streams

mod cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use radioscout::{Config, StationFinder};

#[derive(Parser)]
#[command(name = "radioscout")]
#[command(about = "Find internet radio stations and their streams")]
#[command(version)]
struct Cli {
    /// Increase log output (-v warnings, -vv info, -vvv debug). Errors only by default.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: ~/.config/radioscout/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// How stations are printed.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search all providers for matching radio stations
    Search {
        /// Text to search for (name, call letters, frequency, ...)
        text: String,

        /// Maximum number of results returned by each provider
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show full information about the station at a URL
    Info {
        /// Station page URL
        url: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List the available station providers
    Providers {
        /// Also show provider id and base URL
        #[arg(short, long)]
        long: bool,
    },

    /// Search, then refresh the top hit with its full station information
    Update {
        /// Text to search for
        text: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Print the preferred stream of the station at a URL
    Stream {
        /// Station page URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    let finder = StationFinder::from_config(&config).context("failed to load providers")?;

    match cli.command {
        Commands::Search {
            text,
            limit,
            format,
        } => {
            let limit = limit.map_or(config.default_limit, clamp_limit);
            cmd::search::cmd_search(&finder, &text, limit, format).await?;
        }
        Commands::Info { url, format } => {
            cmd::info::cmd_info(&finder, &url, format).await?;
        }
        Commands::Providers { long } => {
            cmd::providers::cmd_providers(&finder, long);
        }
        Commands::Update { text, format } => {
            cmd::update::cmd_update(&finder, &text, format).await?;
        }
        Commands::Stream { url } => {
            cmd::stream::cmd_stream(&finder, &url).await?;
        }
    }

    Ok(())
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Negative limits are clamped to zero.
fn clamp_limit(limit: i64) -> usize {
    usize::try_from(limit.max(0)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(log_level(0), Level::ERROR);
        assert_eq!(log_level(1), Level::WARN);
        assert_eq!(log_level(2), Level::INFO);
        assert_eq!(log_level(3), Level::DEBUG);
        assert_eq!(log_level(7), Level::DEBUG);
    }

    #[test]
    fn negative_limit_clamps_to_zero() {
        assert_eq!(clamp_limit(-5), 0);
        assert_eq!(clamp_limit(0), 0);
        assert_eq!(clamp_limit(25), 25);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

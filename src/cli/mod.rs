mod logging;
mod report;

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};

use foodtrack::collector::SyncStatus;
use foodtrack::services::store::default_data_dir;
use foodtrack::services::{run_sync, Config, OrderStore};
use foodtrack::types::TOP_RESTAURANTS;
use report::RangeArgs;

/// Food-delivery order history sync and spending dashboard
#[derive(Parser)]
#[command(name = "foodtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.foodtrack/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Fetch the full order history and replace the stored copy
    Sync,

    /// Show spending statistics
    Stats(RangeArgs),

    /// Show top restaurants and the spending breakdown
    Restaurants {
        #[command(flatten)]
        range: RangeArgs,

        /// Number of ranked restaurants
        #[arg(long, default_value_t = TOP_RESTAURANTS)]
        limit: usize,
    },

    /// Print the resolved configuration
    Config,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::load(self.config.as_deref()).context("loading configuration")?;

        match self.command {
            None | Some(Commands::Tui) => {
                logging::init_file(&default_data_dir()?, self.verbose);
                foodtrack::tui::run(config, OrderStore::new()?)
            }
            Some(Commands::Sync) => {
                logging::init_stderr(self.verbose);
                sync(&config)
            }
            Some(Commands::Stats(range)) => {
                logging::init_stderr(self.verbose);
                report::run_stats(&OrderStore::new()?, &range)?;
                Ok(())
            }
            Some(Commands::Restaurants { range, limit }) => {
                logging::init_stderr(self.verbose);
                report::run_restaurants(&OrderStore::new()?, &range, limit)?;
                Ok(())
            }
            Some(Commands::Config) => {
                print!("{}", config.redacted().to_toml()?);
                Ok(())
            }
        }
    }
}

fn sync(config: &Config) -> anyhow::Result<()> {
    let store = OrderStore::new()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    let status = runtime.block_on(run_sync(config, store, |event| {
        eprintln!("{}", event.message());
    }))?;

    if status == SyncStatus::AlreadyRunning {
        eprintln!("A sync is already running.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["foodtrack"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_sync_verbose() {
        let cli = Cli::try_parse_from(["foodtrack", "sync", "-vv"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Sync)));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_parse_stats_range() {
        let cli =
            Cli::try_parse_from(["foodtrack", "stats", "--from", "2024-01-01", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Stats(range)) => {
                assert_eq!(range.from.as_deref(), Some("2024-01-01"));
                assert!(range.json);
            }
            _ => panic!("expected stats"),
        }
    }

    #[test]
    fn test_cli_last_conflicts_with_dates() {
        assert!(
            Cli::try_parse_from(["foodtrack", "stats", "--last", "30", "--to", "2024-01-01"])
                .is_err()
        );
    }

    #[test]
    fn test_cli_parse_restaurants_limit() {
        let cli = Cli::try_parse_from(["foodtrack", "restaurants", "--limit", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Restaurants { limit: 3, .. })
        ));
    }

    #[test]
    fn test_cli_restaurants_default_limit() {
        let cli = Cli::try_parse_from(["foodtrack", "restaurants"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Restaurants { limit: 10, .. })
        ));
    }

    #[test]
    fn test_cli_global_config_path() {
        let cli = Cli::try_parse_from(["foodtrack", "config", "--config", "/tmp/x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }
}

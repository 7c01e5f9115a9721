//! market-feed entry point
//!
//! Small CLI over the feed services: fetch the current market status,
//! fetch the Fear & Greed index, or print a host telemetry snapshot.

use clap::{Parser, Subcommand};
use mfd_infrastructure::config::ConfigLoader;
use mfd_infrastructure::logging::init_logging;
use mfd_infrastructure::telemetry::SystemProbe;
use mfd_providers::cnn::{CnnClient, FearGreed};
use mfd_providers::nasdaq::{MarketStatus, NasdaqClient, market_status::format_duration};

/// Command line interface for market-feed
#[derive(Parser, Debug)]
#[command(name = "mfd")]
#[command(about = "market-feed - Market status and sentiment retrieval")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the current Nasdaq market status
    MarketStatus,
    /// Fetch the CNN Fear & Greed index
    FearGreed {
        /// Historical date in YYYY-MM-DD format
        #[arg(long)]
        date: Option<String>,
    },
    /// Print a host telemetry snapshot
    Snapshot,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;

    init_logging(&config.logging)?;

    match cli.command {
        Command::MarketStatus => {
            let service = MarketStatus::with_client(NasdaqClient::with_base_url(
                &config.feeds.nasdaq_base_url,
            ));
            let status = service
                .fetch_status(Some(config.http.retry_options()))
                .await?;

            println!("{}", serde_json::to_string_pretty(&status)?);
            println!("regular session: {}", service.is_regular_session(&status));
            let delay = service.next_opening_delay(&status)?;
            println!(
                "next opening in: {}",
                format_duration(
                    chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero())
                )
            );
        }
        Command::FearGreed { date } => {
            let service =
                FearGreed::with_client(CnnClient::with_base_url(&config.feeds.cnn_base_url));
            let options = Some(config.http.retry_options());
            let snapshot = match date {
                Some(date) => service.fetch_at_date(&date, options).await?,
                None => service.fetch_latest(options).await?,
            };
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Snapshot => {
            let mut probe = SystemProbe::new();
            println!("{}", serde_json::to_string_pretty(&probe.snapshot())?);
        }
    }

    Ok(())
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use linklet::config::Config;
use linklet::service::UrlService;
use linklet::storage;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "linklet-admin")]
#[command(about = "Linklet management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL (reuses the existing code if it is already stored)
    Shorten {
        /// Absolute URL to shorten
        url: String,
    },
    /// Show statistics for a short code
    Stats {
        /// Short code to look up
        code: String,
    },
    /// Count stored short URLs
    Count,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let storage = storage::connect(&config.database).await?;
    let service = UrlService::new(
        Arc::clone(&storage),
        &config.base_url,
        config.short_code.max_attempts,
    );

    match cli.command {
        Commands::Shorten { url } => {
            let outcome = service.shorten(Some(&url)).await?;
            let record = outcome.record();
            let label = if outcome.is_created() {
                "Created"
            } else {
                "Already shortened"
            };
            println!("✓ {}: {}", label, service.short_url(&record.short_code));
            println!("{:<14} {}", "Original URL:", record.original_url);
            println!("{:<14} {}", "Short code:", record.short_code);
        }
        Commands::Stats { code } => {
            let record = service.stats(&code).await?;
            println!("{:<14} {}", "Short code:", record.short_code);
            println!("{:<14} {}", "Original URL:", record.original_url);
            println!("{:<14} {}", "Created at:", record.created_at_iso());
            println!("{:<14} {}", "Clicks:", record.clicks);
        }
        Commands::Count => {
            let count = storage.count().await?;
            println!("{} short URL(s) stored", count);
        }
    }

    Ok(())
}

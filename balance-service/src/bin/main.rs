use balance_service::{BalanceService, BalanceServiceConfig};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Balance Service CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Commands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the balance service
    Start {
        /// Database URL
        #[arg(short, long)]
        database_url: Option<String>,

        /// Database pool size
        #[arg(short, long)]
        pool_size: Option<u32>,

        /// LRU cache capacity
        #[arg(short, long)]
        cache_capacity: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "balance_service={}",
            cli.log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Process commands
    match cli.command {
        Commands::Start {
            database_url,
            pool_size,
            cache_capacity,
        } => {
            // Create config using provided values or env vars
            let config = if let Some(url) = database_url {
                let pool_size = pool_size.unwrap_or(5);
                let cache_capacity = cache_capacity.unwrap_or(10);
                BalanceServiceConfig::new(url, pool_size, cache_capacity)
            } else {
                BalanceServiceConfig::from_env()
            };

            // Print config (except database password)
            info!(
                "Starting balance service with database pool size: {}, cache capacity: {}",
                config.db_pool_size, config.cache_capacity
            );

            // Initialize service
            let _service = BalanceService::with_config(&config).await?;

            // Wait for ctrl-c
            info!("Balance service started. Press Ctrl+C to stop.");
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutting down balance service...");
                }
                Err(err) => {
                    error!("Error waiting for Ctrl+C: {}", err);
                }
            }
        }
    }

    Ok(())
}

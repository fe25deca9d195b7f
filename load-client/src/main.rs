//! Load-generating client for the balance engine
//!
//! Spawns a configurable number of reader and writer tasks that hammer the
//! gateway with random keys, plus an administrative command for resetting
//! the operation statistics.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rand::Rng;
use serde_json::json;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Balance engine load client
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gateway base URL
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    addr: String,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Commands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run reader and writer tasks against the account endpoints
    UpdateAccounts {
        /// Number of concurrent reader tasks
        #[arg(long, default_value_t = 2)]
        readers: usize,

        /// Number of concurrent writer tasks
        #[arg(long, default_value_t = 2)]
        writers: usize,

        /// Account ids the tasks pick from at random
        #[arg(long, value_delimiter = ',', default_value = "1,2,3,4,5")]
        keys: Vec<i32>,

        /// Seconds to run before exiting
        #[arg(long, default_value_t = 15)]
        idle: u64,
    },

    /// Reset the operation statistics on the server
    ResetStat,
}

/// The request class a worker issues
#[derive(Clone, Copy)]
enum Operation {
    Read,
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "Reader"),
            Operation::Write => write!(f, "Writer"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "load_client={}",
            cli.log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::UpdateAccounts {
            readers,
            writers,
            keys,
            idle,
        } => update_accounts(&cli.addr, readers, writers, keys, idle).await,
        Commands::ResetStat => reset_stat(&cli.addr).await,
    }
}

async fn update_accounts(
    addr: &str,
    readers: usize,
    writers: usize,
    keys: Vec<i32>,
    idle: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let keys = Arc::new(keys);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut handles = Vec::with_capacity(readers + writers);
    for id in 0..readers {
        handles.push(tokio::spawn(run_worker(
            id,
            Operation::Read,
            client.clone(),
            addr.to_string(),
            Arc::clone(&keys),
            shutdown_rx.clone(),
        )));
    }
    for id in 0..writers {
        handles.push(tokio::spawn(run_worker(
            readers + id,
            Operation::Write,
            client.clone(),
            addr.to_string(),
            Arc::clone(&keys),
            shutdown_rx.clone(),
        )));
    }

    // Run until the idle deadline or Ctrl+C, whichever comes first
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(idle)) => {}
        _ = signal::ctrl_c() => {}
    }

    let _ = shutdown_tx.send(true);
    for handle in handles {
        let _ = handle.await;
    }

    info!("done");
    Ok(())
}

async fn run_worker(
    id: usize,
    operation: Operation,
    client: reqwest::Client,
    addr: String,
    keys: Arc<Vec<i32>>,
    shutdown: watch::Receiver<bool>,
) {
    // Re-checked once per request; an in-flight request finishes first
    while !*shutdown.borrow() {

        let (key, amount) = {
            let mut rng = rand::thread_rng();
            let key = keys[rng.gen_range(0..keys.len())];
            (key, rng.gen_range(-10..=10i64))
        };

        let result = match operation {
            Operation::Read => do_read(&client, &addr, id, key).await,
            Operation::Write => do_write(&client, &addr, id, key, amount).await,
        };

        if let Err(e) = result {
            error!("[{} {}]\t{}", operation, id, e);
        }
    }
}

async fn do_read(client: &reqwest::Client, addr: &str, id: usize, key: i32) -> reqwest::Result<()> {
    let response = client
        .get(format!("{}/api/v1/accounts/{}/balance", addr, key))
        .send()
        .await?;

    let status = response.status();
    let body: serde_json::Value = response.json().await.unwrap_or_default();
    info!(
        "[Reader {}]\taccount_{}\tstatus: {}\tbalance: {}",
        id, key, status, body["data"]["balance"]
    );

    Ok(())
}

async fn do_write(
    client: &reqwest::Client,
    addr: &str,
    id: usize,
    key: i32,
    amount: i64,
) -> reqwest::Result<()> {
    let response = client
        .post(format!("{}/api/v1/accounts/{}/balance", addr, key))
        .json(&json!({ "amount": amount }))
        .send()
        .await?;

    info!(
        "[Writer {}]\taccount_{}\tadd amount {}\tstatus: {}",
        id,
        key,
        amount,
        response.status()
    );

    Ok(())
}

async fn reset_stat(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/v1/stats/reset", addr))
        .send()
        .await?;

    info!("reset statistics: status {}", response.status());
    Ok(())
}

//! API Gateway for the balance engine

mod api;
mod config;
mod error;
mod router;

use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use balance_service::{BalanceService, RepositoryType};
use stats_service::StatsService;

use crate::config::AppConfig;

/// API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Account routes
        api::account::get_balance,
        api::account::add_amount,
        // Statistics routes
        api::stats::get_stats,
        api::stats::reset_stats,
    ),
    components(
        schemas(
            // Account API
            api::account::BalanceData,
            api::account::AddAmountRequest,
            api::account::AddAmountResult,

            // Statistics API
            api::stats::ResetResult,
            stats_service::StatsSnapshot,

            // Response models
            api::response::ApiResponse<api::account::BalanceData>,
            api::response::ApiResponse<stats_service::StatsSnapshot>
        )
    ),
    tags(
        (name = "account", description = "Account balance endpoints"),
        (name = "stats", description = "Operation statistics endpoints")
    ),
    info(
        title = "Balance Engine API",
        version = "1.0.0",
        description = "API for the balance engine allowing balance reads, balance updates, and operation statistics"
    )
)]
struct ApiDoc;

/// Balance engine API server
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Listening address; defaults to the ADDR env var or 127.0.0.1:8080
    #[clap(short, long)]
    addr: Option<String>,
}

/// App state shared across handlers
pub struct AppState {
    /// Balance service
    pub balance_service: Arc<BalanceService>,
    /// Operation statistics service
    pub stats_service: Arc<StatsService>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging with debug level when DEBUG=1 env var is set
    let env = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env == "1" { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .parse("tower_http=debug,api_gateway=debug,stats_service=info")?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Debug logging enabled");

    // Initialize services
    let config = AppConfig::new();

    let balance_service = Arc::new(match config.database_url.clone() {
        Some(url) => {
            info!("Using PostgreSQL storage");
            BalanceService::with_repository(
                RepositoryType::Postgres(Some(url)),
                config.cache_capacity,
            )
            .await?
        }
        None => {
            info!("Using in-memory storage");
            BalanceService::new(config.cache_capacity)
        }
    });

    // The statistics sampler stops when this channel fires
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let stats_service = StatsService::spawn(config.polling_interval, shutdown_rx);

    // Create app state
    let state = Arc::new(AppState {
        balance_service,
        stats_service,
    });

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Set up Swagger UI
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    // Combine all routes
    let app = router::app(state)
        .merge(swagger_ui)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(log_level))
                .on_request(DefaultOnRequest::new().level(log_level))
                .on_response(DefaultOnResponse::new().level(log_level)),
        );

    // Start the server
    let addr = args.addr.unwrap_or_else(|| config.addr.clone());
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    // Run until interrupt signal
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the statistics sampler along with the server
    let _ = shutdown_tx.send(true);

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

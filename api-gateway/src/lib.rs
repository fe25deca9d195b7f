// api-gateway/src/lib.rs
pub mod api;
pub mod error;
pub mod config;
pub mod router;

use std::sync::Arc;

use balance_service::BalanceService;
use stats_service::StatsService;

/// App state shared across handlers
pub struct AppState {
    /// Balance service
    pub balance_service: Arc<BalanceService>,
    /// Operation statistics service
    pub stats_service: Arc<StatsService>,
}

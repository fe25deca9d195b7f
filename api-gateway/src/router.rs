//! HTTP route assembly
//!
//! Kept separate from `main` so integration tests can build the same
//! router against in-memory services.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::account::{add_amount, get_balance};
use crate::api::stats::{get_stats, reset_stats};
use crate::AppState;

/// Build the application router over the given state
pub fn app(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Account routes
        .route("/accounts/:id/balance", get(get_balance).post(add_amount))
        // Statistics routes
        .route("/stats", get(get_stats))
        .route("/stats/reset", post(reset_stats));

    Router::new().nest("/api/v1", api_routes).with_state(state)
}

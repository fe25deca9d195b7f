//! Statistics API handlers
//!
//! Administrative endpoints over the operation statistics service.

use std::sync::Arc;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use stats_service::StatsSnapshot;
use utoipa::ToSchema;

use crate::api::response::ApiResponse;
use crate::error::ApiError;
use crate::AppState;

/// Get the current operation statistics
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Statistics retrieved successfully")
    ),
    tag = "stats"
)]
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<StatsSnapshot>, ApiError> {
    Ok(ApiResponse::new(state.stats_service.snapshot()))
}

/// Reset result (empty on success)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResetResult {}

/// Reset the cumulative operation counters
///
/// The background sampler keeps running; the interval in which the reset
/// lands skips its rate computation.
#[utoipa::path(
    post,
    path = "/api/v1/stats/reset",
    responses(
        (status = 200, description = "Statistics reset successfully")
    ),
    tag = "stats"
)]
pub async fn reset_stats(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<ResetResult>, ApiError> {
    state.stats_service.reset();

    Ok(ApiResponse::new(ResetResult {}))
}

//! Account API handlers
//!
//! Handles the two balance request classes:
//! - Get the balance of an account
//! - Add a signed amount to an account
//!
//! Each inbound request bumps the matching statistics counter exactly once,
//! before the service call, so the counters see failures too.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use common::model::account::AccountId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::response::ApiResponse;
use crate::error::ApiError;
use crate::AppState;

/// Balance of a single account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceData {
    /// Account ID
    pub id: i32,
    /// Current balance
    pub balance: i64,
}

/// Get the balance of an account
///
/// Unknown accounts read as balance zero.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}/balance",
    params(
        ("id" = i32, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Balance retrieved successfully"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
) -> Result<ApiResponse<BalanceData>, ApiError> {
    state.stats_service.inc_reads();

    let balance = state
        .balance_service
        .get_amount(id)
        .await
        .map_err(ApiError::Common)?;

    Ok(ApiResponse::new(BalanceData { id, balance }))
}

/// Add amount request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddAmountRequest {
    /// Signed amount: positive = deposit, negative = withdrawal
    pub amount: i64,
}

/// Add a signed amount to an account's balance
///
/// Creates the account when it does not exist and the amount is strictly
/// positive. Refuses to let a balance go negative.
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{id}/balance",
    params(
        ("id" = i32, Path, description = "Account ID")
    ),
    request_body = AddAmountRequest,
    responses(
        (status = 200, description = "Amount applied successfully"),
        (status = 400, description = "Insufficient balance or invalid creation"),
        (status = 500, description = "Internal server error")
    ),
    tag = "account"
)]
pub async fn add_amount(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
    Json(request): Json<AddAmountRequest>,
) -> Result<ApiResponse<AddAmountResult>, ApiError> {
    state.stats_service.inc_writes();

    state
        .balance_service
        .add_amount(id, request.amount)
        .await
        .map_err(ApiError::Common)?;

    Ok(ApiResponse::new(AddAmountResult {}))
}

/// Add amount result (empty on success)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddAmountResult {}

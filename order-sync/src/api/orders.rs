//! Back-office order lifecycle endpoints
//!
//! PUT    /api/orders/{id}/status
//! GET    /api/orders/{id}/history
//! DELETE /api/orders/{id}

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::StatusHistoryEntry;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    /// External or canonical status phrase, e.g. "Order Confirmed"
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub order_id: i64,
    pub status: String,
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    Json(req): Json<StatusUpdateRequest>,
) -> AppResult<ApiResponse<StatusUpdateResponse>> {
    let status = state
        .service
        .update_status(order_id, &req.status, req.reason.as_deref())
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(StatusUpdateResponse {
        order_id,
        status: status.to_string(),
    }))
}

pub async fn status_history(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<StatusHistoryEntry>>> {
    let history = state
        .service
        .status_history(order_id)
        .await
        .map_err(AppError::from)?;
    Ok(ApiResponse::success(history))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state
        .service
        .delete_order(order_id)
        .await
        .map_err(AppError::from)?;
    Ok(ApiResponse::ok())
}

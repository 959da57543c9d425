//! Storefront endpoints
//!
//! POST /api/storefront/orders: reconcile one order (raw body for signature verification)
//! GET  /api/storefront/orders: unified order listing

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use shared::error::{ApiResponse, AppError, AppResult};
use shared::storefront::{ReconcileOutcome, StorefrontOrder};

use crate::error::SyncError;
use crate::signature::{self, SIGNATURE_HEADER};
use crate::state::AppState;

/// Reconcile an order pushed by the storefront.
///
/// The body is always a [`ReconcileOutcome`]; the status code says why it failed.
pub async fn reconcile_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = state.webhook_secret.as_deref() {
        let header = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        if let Err(e) = signature::verify(&body, header, secret) {
            tracing::warn!(error = %e, "Storefront signature verification failed");
            return (StatusCode::UNAUTHORIZED, Json(ReconcileOutcome::failed(e.to_string())))
                .into_response();
        }
    }

    let report = state.service.reconcile_json(&body).await;
    let status = match report.error {
        None => StatusCode::OK,
        Some(SyncError::Validation(_)) => StatusCode::BAD_REQUEST,
        Some(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(report.outcome)).into_response()
}

pub async fn list_orders(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<StorefrontOrder>>> {
    let orders = state.service.list_orders().await.map_err(AppError::from)?;
    Ok(ApiResponse::success(orders))
}

//! Pipeline error type
//!
//! `SyncError` is what every reconciliation step returns. The facade turns it
//! into a [`ReconcileOutcome`](shared::ReconcileOutcome); the HTTP layer turns
//! it into an [`AppError`] via the `From` impl below.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Payload rejected before any store access
    #[error("invalid order payload: {0}")]
    Validation(String),

    #[error("failed to resolve customer: {0}")]
    Party(#[source] StoreError),

    #[error("failed to resolve catalog item {sku}: {source}")]
    Catalog {
        sku: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to create order header: {0}")]
    Header(#[source] StoreError),

    /// Line insert failed after the header was written (header compensated)
    #[error("failed to create order lines: {0}")]
    Lines(#[source] StoreError),

    /// A payload line has no resolved catalog item
    #[error("order line {key} has no resolved catalog item")]
    UnmatchedLine { key: String },

    #[error("order {0} not found")]
    OrderNotFound(i64),

    /// Store rejected a status update; message passed through unchanged
    #[error("{0}")]
    StatusUpdate(#[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SyncError::Validation(_) => ErrorCode::ValidationFailed,
            SyncError::Party(StoreError::Duplicate(_)) => ErrorCode::PartyEmailConflict,
            SyncError::Party(_) => ErrorCode::PartyResolutionFailed,
            SyncError::Catalog {
                source: StoreError::Duplicate(_),
                ..
            } => ErrorCode::CatalogSkuConflict,
            SyncError::Catalog { .. } => ErrorCode::CatalogResolutionFailed,
            SyncError::Header(StoreError::Duplicate(_)) => ErrorCode::OrderNumberConflict,
            SyncError::Header(_) | SyncError::Lines(_) => ErrorCode::OrderAssemblyFailed,
            SyncError::UnmatchedLine { .. } => ErrorCode::OrderLineUnmatched,
            SyncError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            SyncError::StatusUpdate(_) => ErrorCode::OrderStatusRejected,
            SyncError::Store(StoreError::NotFound(_)) => ErrorCode::NotFound,
            SyncError::Store(StoreError::Duplicate(_)) => ErrorCode::AlreadyExists,
            SyncError::Store(StoreError::Unavailable(_)) => ErrorCode::StoreUnavailable,
            SyncError::Store(StoreError::Database(_)) => ErrorCode::DatabaseError,
        }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        let code = err.code();
        let app_err = AppError::with_message(code, err.to_string());
        match err {
            SyncError::OrderNotFound(id) => app_err.with_detail("order_id", id),
            SyncError::Catalog { sku, .. } => app_err.with_detail("sku", sku),
            SyncError::UnmatchedLine { key } => app_err.with_detail("line", key),
            _ => app_err,
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

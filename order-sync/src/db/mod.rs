//! Record store access layer
//!
//! [`RecordStore`] is the only seam between the reconciliation pipeline and
//! persistence. Every operation is scoped by tenant. Two implementations:
//! - [`PgStore`]: PostgreSQL via sqlx (production)
//! - [`MemoryStore`]: in-process maps enforcing the same uniqueness rules

pub mod memory;
pub mod pg;

pub use memory::{FailPoint, MemoryStore};
pub use pg::PgStore;

use async_trait::async_trait;
use shared::models::{
    CatalogItem, CatalogItemCreate, LedgerEntry, LedgerEntryCreate, OrderHeader,
    OrderHeaderCreate, OrderLine, OrderLineCreate, OrderStatus, Party, PartyCreate,
    StatusHistoryEntry,
};
use shared::storefront::StorefrontOrder;
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness constraint violated (concurrent writer won)
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate(match db_err.constraint() {
                    Some(constraint) => format!("{} ({constraint})", db_err.message()),
                    None => db_err.message().to_string(),
                })
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Change of one catalog item's on-hand quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    pub item_id: i64,
    pub delta: i64,
}

/// Tenant-scoped persistence used by the reconciliation pipeline
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ── Party ──
    async fn find_party_by_email(&self, tenant_id: &str, email: &str)
    -> StoreResult<Option<Party>>;
    async fn insert_party(&self, tenant_id: &str, data: PartyCreate) -> StoreResult<Party>;
    async fn find_parties(&self, tenant_id: &str, ids: &[i64]) -> StoreResult<Vec<Party>>;

    // ── Catalog ──
    async fn find_item_by_sku(&self, tenant_id: &str, sku: &str)
    -> StoreResult<Option<CatalogItem>>;
    async fn insert_item(&self, tenant_id: &str, data: CatalogItemCreate)
    -> StoreResult<CatalogItem>;
    async fn find_items(&self, tenant_id: &str, ids: &[i64]) -> StoreResult<Vec<CatalogItem>>;

    // ── Order header ──
    /// Highest order number of the tenant starting with `prefix`
    async fn latest_order_number(&self, tenant_id: &str, prefix: &str)
    -> StoreResult<Option<String>>;
    async fn find_order(&self, tenant_id: &str, order_id: i64) -> StoreResult<Option<OrderHeader>>;
    async fn find_order_by_external_id(
        &self,
        tenant_id: &str,
        origin: &str,
        external_order_id: &str,
    ) -> StoreResult<Option<OrderHeader>>;
    async fn insert_order(&self, tenant_id: &str, data: OrderHeaderCreate)
    -> StoreResult<OrderHeader>;
    async fn update_order_status(
        &self,
        tenant_id: &str,
        order_id: i64,
        status: &OrderStatus,
    ) -> StoreResult<()>;
    /// Returns false when no such order existed
    async fn delete_order(&self, tenant_id: &str, order_id: i64) -> StoreResult<bool>;
    /// Orders with the given origin, newest first
    async fn list_orders(&self, tenant_id: &str, origin: &str) -> StoreResult<Vec<OrderHeader>>;

    // ── Order lines ──
    /// Bulk insert; all lines or none
    async fn insert_lines(
        &self,
        tenant_id: &str,
        order_id: i64,
        lines: &[OrderLineCreate],
    ) -> StoreResult<Vec<OrderLine>>;
    async fn find_lines(&self, tenant_id: &str, order_ids: &[i64]) -> StoreResult<Vec<OrderLine>>;
    async fn delete_lines(&self, tenant_id: &str, order_id: i64) -> StoreResult<u64>;

    // ── Status history ──
    async fn append_status_history(
        &self,
        tenant_id: &str,
        order_id: i64,
        status: &OrderStatus,
        reason: Option<&str>,
    ) -> StoreResult<StatusHistoryEntry>;
    async fn list_status_history(
        &self,
        tenant_id: &str,
        order_id: i64,
    ) -> StoreResult<Vec<StatusHistoryEntry>>;

    // ── Ledger ──
    async fn find_ledger_entry(
        &self,
        tenant_id: &str,
        category: &str,
        reference: &str,
    ) -> StoreResult<Option<LedgerEntry>>;
    /// Insert `entry` and apply every stock adjustment as one unit.
    ///
    /// Returns `None` and leaves stock untouched when an entry with the same
    /// (category, reference) is already booked.
    async fn record_delivery(
        &self,
        tenant_id: &str,
        adjustments: &[StockAdjustment],
        entry: LedgerEntryCreate,
    ) -> StoreResult<Option<LedgerEntry>>;
    async fn delete_ledger_entries(
        &self,
        tenant_id: &str,
        category: &str,
        reference: &str,
    ) -> StoreResult<u64>;

    // ── Aggregated view ──
    /// Denormalized read of orders with the given origin, newest first
    async fn list_order_view(&self, tenant_id: &str, origin: &str)
    -> StoreResult<Vec<StorefrontOrder>>;
}

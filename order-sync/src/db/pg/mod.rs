//! PostgreSQL record store

mod catalog;
mod ledger;
mod order;
mod party;
mod view;

use std::time::Duration;

use async_trait::async_trait;
use shared::models::{
    CatalogItem, CatalogItemCreate, LedgerEntry, LedgerEntryCreate, OrderHeader,
    OrderHeaderCreate, OrderLine, OrderLineCreate, OrderStatus, Party, PartyCreate,
    StatusHistoryEntry,
};
use shared::storefront::StorefrontOrder;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{RecordStore, StockAdjustment, StoreResult};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and run embedded migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(max_connections, "PostgreSQL pool ready, migrations applied");

        Ok(Self { pool })
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn find_party_by_email(&self, tenant_id: &str, email: &str) -> StoreResult<Option<Party>> {
        party::find_by_email(&self.pool, tenant_id, email).await
    }

    async fn insert_party(&self, tenant_id: &str, data: PartyCreate) -> StoreResult<Party> {
        party::insert(&self.pool, tenant_id, data).await
    }

    async fn find_parties(&self, tenant_id: &str, ids: &[i64]) -> StoreResult<Vec<Party>> {
        party::find_many(&self.pool, tenant_id, ids).await
    }

    async fn find_item_by_sku(&self, tenant_id: &str, sku: &str) -> StoreResult<Option<CatalogItem>> {
        catalog::find_by_sku(&self.pool, tenant_id, sku).await
    }

    async fn insert_item(&self, tenant_id: &str, data: CatalogItemCreate) -> StoreResult<CatalogItem> {
        catalog::insert(&self.pool, tenant_id, data).await
    }

    async fn find_items(&self, tenant_id: &str, ids: &[i64]) -> StoreResult<Vec<CatalogItem>> {
        catalog::find_many(&self.pool, tenant_id, ids).await
    }

    async fn latest_order_number(&self, tenant_id: &str, prefix: &str) -> StoreResult<Option<String>> {
        order::latest_number(&self.pool, tenant_id, prefix).await
    }

    async fn find_order(&self, tenant_id: &str, order_id: i64) -> StoreResult<Option<OrderHeader>> {
        order::find(&self.pool, tenant_id, order_id).await
    }

    async fn find_order_by_external_id(
        &self,
        tenant_id: &str,
        origin: &str,
        external_order_id: &str,
    ) -> StoreResult<Option<OrderHeader>> {
        order::find_by_external_id(&self.pool, tenant_id, origin, external_order_id).await
    }

    async fn insert_order(&self, tenant_id: &str, data: OrderHeaderCreate) -> StoreResult<OrderHeader> {
        order::insert(&self.pool, tenant_id, data).await
    }

    async fn update_order_status(
        &self,
        tenant_id: &str,
        order_id: i64,
        status: &OrderStatus,
    ) -> StoreResult<()> {
        order::update_status(&self.pool, tenant_id, order_id, status).await
    }

    async fn delete_order(&self, tenant_id: &str, order_id: i64) -> StoreResult<bool> {
        order::delete(&self.pool, tenant_id, order_id).await
    }

    async fn list_orders(&self, tenant_id: &str, origin: &str) -> StoreResult<Vec<OrderHeader>> {
        order::list(&self.pool, tenant_id, origin).await
    }

    async fn insert_lines(
        &self,
        tenant_id: &str,
        order_id: i64,
        lines: &[OrderLineCreate],
    ) -> StoreResult<Vec<OrderLine>> {
        order::insert_lines(&self.pool, tenant_id, order_id, lines).await
    }

    async fn find_lines(&self, tenant_id: &str, order_ids: &[i64]) -> StoreResult<Vec<OrderLine>> {
        order::find_lines(&self.pool, tenant_id, order_ids).await
    }

    async fn delete_lines(&self, tenant_id: &str, order_id: i64) -> StoreResult<u64> {
        order::delete_lines(&self.pool, tenant_id, order_id).await
    }

    async fn append_status_history(
        &self,
        tenant_id: &str,
        order_id: i64,
        status: &OrderStatus,
        reason: Option<&str>,
    ) -> StoreResult<StatusHistoryEntry> {
        order::append_history(&self.pool, tenant_id, order_id, status, reason).await
    }

    async fn list_status_history(
        &self,
        tenant_id: &str,
        order_id: i64,
    ) -> StoreResult<Vec<StatusHistoryEntry>> {
        order::list_history(&self.pool, tenant_id, order_id).await
    }

    async fn find_ledger_entry(
        &self,
        tenant_id: &str,
        category: &str,
        reference: &str,
    ) -> StoreResult<Option<LedgerEntry>> {
        ledger::find(&self.pool, tenant_id, category, reference).await
    }

    async fn record_delivery(
        &self,
        tenant_id: &str,
        adjustments: &[StockAdjustment],
        entry: LedgerEntryCreate,
    ) -> StoreResult<Option<LedgerEntry>> {
        ledger::record_delivery(&self.pool, tenant_id, adjustments, entry).await
    }

    async fn delete_ledger_entries(
        &self,
        tenant_id: &str,
        category: &str,
        reference: &str,
    ) -> StoreResult<u64> {
        ledger::delete(&self.pool, tenant_id, category, reference).await
    }

    async fn list_order_view(&self, tenant_id: &str, origin: &str) -> StoreResult<Vec<StorefrontOrder>> {
        view::list(&self.pool, tenant_id, origin).await
    }
}

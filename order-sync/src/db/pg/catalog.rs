//! Catalog item database operations

use shared::models::{CatalogItem, CatalogItemCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use crate::db::StoreResult;

const COLUMNS: &str = "id, tenant_id, name, sku, unit_cost, unit_price, quantity, is_active, \
                       is_storefront_item, created_at";

pub async fn find_by_sku(pool: &PgPool, tenant_id: &str, sku: &str) -> StoreResult<Option<CatalogItem>> {
    let item = sqlx::query_as::<_, CatalogItem>(&format!(
        "SELECT {COLUMNS} FROM catalog_items WHERE tenant_id = $1 AND sku = $2"
    ))
    .bind(tenant_id)
    .bind(sku)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn insert(pool: &PgPool, tenant_id: &str, data: CatalogItemCreate) -> StoreResult<CatalogItem> {
    let item = sqlx::query_as::<_, CatalogItem>(&format!(
        r#"
        INSERT INTO catalog_items (
            id, tenant_id, name, sku, unit_cost, unit_price, quantity,
            is_active, is_storefront_item, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(tenant_id)
    .bind(&data.name)
    .bind(&data.sku)
    .bind(data.unit_cost)
    .bind(data.unit_price)
    .bind(data.quantity)
    .bind(data.is_active)
    .bind(data.is_storefront_item)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(item)
}

pub async fn find_many(pool: &PgPool, tenant_id: &str, ids: &[i64]) -> StoreResult<Vec<CatalogItem>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let items = sqlx::query_as::<_, CatalogItem>(&format!(
        "SELECT {COLUMNS} FROM catalog_items WHERE tenant_id = $1 AND id = ANY($2)"
    ))
    .bind(tenant_id)
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

//! Ledger database operations

use std::collections::HashSet;

use shared::models::{LedgerEntry, LedgerEntryCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use crate::db::{StockAdjustment, StoreError, StoreResult};

const COLUMNS: &str = "id, tenant_id, kind, amount, category, reference, entry_date, created_at";

pub async fn find(
    pool: &PgPool,
    tenant_id: &str,
    category: &str,
    reference: &str,
) -> StoreResult<Option<LedgerEntry>> {
    let entry = sqlx::query_as::<_, LedgerEntry>(&format!(
        "SELECT {COLUMNS} FROM ledger_entries \
         WHERE tenant_id = $1 AND category = $2 AND reference = $3 LIMIT 1"
    ))
    .bind(tenant_id)
    .bind(category)
    .bind(reference)
    .fetch_optional(pool)
    .await?;
    Ok(entry)
}

/// Book the entry, then apply the stock adjustments in the same transaction.
///
/// The insert is a no-op on the (tenant, category, reference) unique index, in
/// which case the transaction is dropped and stock stays untouched.
pub async fn record_delivery(
    pool: &PgPool,
    tenant_id: &str,
    adjustments: &[StockAdjustment],
    data: LedgerEntryCreate,
) -> StoreResult<Option<LedgerEntry>> {
    let mut tx = pool.begin().await?;

    let entry = sqlx::query_as::<_, LedgerEntry>(&format!(
        r#"
        INSERT INTO ledger_entries (id, tenant_id, kind, amount, category, reference, entry_date, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (tenant_id, category, reference) DO NOTHING
        RETURNING {COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(tenant_id)
    .bind(data.kind.as_str())
    .bind(data.amount)
    .bind(&data.category)
    .bind(&data.reference)
    .bind(data.entry_date)
    .bind(now_millis())
    .fetch_optional(&mut *tx)
    .await?;

    let Some(entry) = entry else {
        return Ok(None);
    };

    let (item_ids, deltas): (Vec<i64>, Vec<i64>) =
        adjustments.iter().map(|a| (a.item_id, a.delta)).unzip();
    let distinct: HashSet<i64> = item_ids.iter().copied().collect();

    let updated = sqlx::query(
        r#"
        UPDATE catalog_items c
        SET quantity = c.quantity + a.delta
        FROM (
            SELECT item_id, SUM(delta)::BIGINT AS delta
            FROM UNNEST($2::BIGINT[], $3::BIGINT[]) AS u(item_id, delta)
            GROUP BY item_id
        ) a
        WHERE c.tenant_id = $1 AND c.id = a.item_id
        "#,
    )
    .bind(tenant_id)
    .bind(&item_ids)
    .bind(&deltas)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated != distinct.len() as u64 {
        return Err(StoreError::NotFound(format!(
            "{} of {} catalog items not found for delivery {}",
            distinct.len() as u64 - updated,
            distinct.len(),
            entry.reference
        )));
    }

    tx.commit().await?;
    Ok(Some(entry))
}

pub async fn delete(pool: &PgPool, tenant_id: &str, category: &str, reference: &str) -> StoreResult<u64> {
    let rows = sqlx::query(
        "DELETE FROM ledger_entries WHERE tenant_id = $1 AND category = $2 AND reference = $3",
    )
    .bind(tenant_id)
    .bind(category)
    .bind(reference)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows)
}

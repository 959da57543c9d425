//! Order header, line and status history database operations

use shared::models::{
    OrderHeader, OrderHeaderCreate, OrderLine, OrderLineCreate, OrderStatus, StatusHistoryEntry,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use crate::db::{StoreError, StoreResult};

const HEADER_COLUMNS: &str = "id, tenant_id, order_number, party_id, external_order_id, \
     order_date, total_amount, status, payment_method, notes, origin, shipping_address, \
     shipping_city, shipping_postal_code, contact_email, contact_phone, created_at";

// ── Header ──

/// Highest order number with the prefix; longer numbers rank above shorter ones
pub async fn latest_number(pool: &PgPool, tenant_id: &str, prefix: &str) -> StoreResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT order_number FROM orders
        WHERE tenant_id = $1 AND left(order_number, length($2)) = $2
        ORDER BY length(order_number) DESC, order_number DESC
        LIMIT 1
        "#,
    )
    .bind(tenant_id)
    .bind(prefix)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(number,)| number))
}

pub async fn find(pool: &PgPool, tenant_id: &str, order_id: i64) -> StoreResult<Option<OrderHeader>> {
    let order = sqlx::query_as::<_, OrderHeader>(&format!(
        "SELECT {HEADER_COLUMNS} FROM orders WHERE tenant_id = $1 AND id = $2"
    ))
    .bind(tenant_id)
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

pub async fn find_by_external_id(
    pool: &PgPool,
    tenant_id: &str,
    origin: &str,
    external_order_id: &str,
) -> StoreResult<Option<OrderHeader>> {
    let order = sqlx::query_as::<_, OrderHeader>(&format!(
        "SELECT {HEADER_COLUMNS} FROM orders \
         WHERE tenant_id = $1 AND origin = $2 AND external_order_id = $3"
    ))
    .bind(tenant_id)
    .bind(origin)
    .bind(external_order_id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

pub async fn insert(pool: &PgPool, tenant_id: &str, data: OrderHeaderCreate) -> StoreResult<OrderHeader> {
    let order = sqlx::query_as::<_, OrderHeader>(&format!(
        r#"
        INSERT INTO orders (
            id, tenant_id, order_number, party_id, external_order_id, order_date,
            total_amount, status, payment_method, notes, origin, shipping_address,
            shipping_city, shipping_postal_code, contact_email, contact_phone, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        RETURNING {HEADER_COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(tenant_id)
    .bind(&data.order_number)
    .bind(data.party_id)
    .bind(&data.external_order_id)
    .bind(data.order_date)
    .bind(data.total_amount)
    .bind(data.status.as_str())
    .bind(&data.payment_method)
    .bind(&data.notes)
    .bind(&data.origin)
    .bind(&data.shipping_address)
    .bind(&data.shipping_city)
    .bind(&data.shipping_postal_code)
    .bind(&data.contact_email)
    .bind(&data.contact_phone)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(order)
}

pub async fn update_status(
    pool: &PgPool,
    tenant_id: &str,
    order_id: i64,
    status: &OrderStatus,
) -> StoreResult<()> {
    let rows = sqlx::query("UPDATE orders SET status = $3 WHERE tenant_id = $1 AND id = $2")
        .bind(tenant_id)
        .bind(order_id)
        .bind(status.as_str())
        .execute(pool)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(StoreError::NotFound(format!("Order {order_id} not found")));
    }
    Ok(())
}

pub async fn delete(pool: &PgPool, tenant_id: &str, order_id: i64) -> StoreResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE tenant_id = $1 AND id = $2")
        .bind(tenant_id)
        .bind(order_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

pub async fn list(pool: &PgPool, tenant_id: &str, origin: &str) -> StoreResult<Vec<OrderHeader>> {
    let orders = sqlx::query_as::<_, OrderHeader>(&format!(
        "SELECT {HEADER_COLUMNS} FROM orders WHERE tenant_id = $1 AND origin = $2 \
         ORDER BY order_date DESC, id DESC"
    ))
    .bind(tenant_id)
    .bind(origin)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

// ── Lines ──

/// Insert all lines in one statement so either every line lands or none does
pub async fn insert_lines(
    pool: &PgPool,
    tenant_id: &str,
    order_id: i64,
    lines: &[OrderLineCreate],
) -> StoreResult<Vec<OrderLine>> {
    if lines.is_empty() {
        return Ok(vec![]);
    }
    let ids: Vec<i64> = lines.iter().map(|_| snowflake_id()).collect();
    let item_ids: Vec<i64> = lines.iter().map(|l| l.item_id).collect();
    let quantities: Vec<i32> = lines.iter().map(|l| l.quantity).collect();
    let unit_prices: Vec<_> = lines.iter().map(|l| l.unit_price).collect();
    let total_prices: Vec<_> = lines.iter().map(|l| l.total_price).collect();
    let discounts: Vec<_> = lines.iter().map(|l| l.discount).collect();

    let created = sqlx::query_as::<_, OrderLine>(
        r#"
        INSERT INTO order_lines (id, order_id, item_id, quantity, unit_price, total_price, discount)
        SELECT l.id, o.id, l.item_id, l.quantity, l.unit_price, l.total_price, l.discount
        FROM UNNEST($3::bigint[], $4::bigint[], $5::integer[], $6::numeric[], $7::numeric[], $8::numeric[])
            AS l(id, item_id, quantity, unit_price, total_price, discount)
        JOIN orders o ON o.id = $2 AND o.tenant_id = $1
        RETURNING id, order_id, item_id, quantity, unit_price, total_price, discount
        "#,
    )
    .bind(tenant_id)
    .bind(order_id)
    .bind(&ids)
    .bind(&item_ids)
    .bind(&quantities)
    .bind(&unit_prices)
    .bind(&total_prices)
    .bind(&discounts)
    .fetch_all(pool)
    .await?;

    if created.len() != lines.len() {
        return Err(StoreError::NotFound(format!("Order {order_id} not found")));
    }
    Ok(created)
}

pub async fn find_lines(pool: &PgPool, tenant_id: &str, order_ids: &[i64]) -> StoreResult<Vec<OrderLine>> {
    if order_ids.is_empty() {
        return Ok(vec![]);
    }
    let lines = sqlx::query_as::<_, OrderLine>(
        r#"
        SELECT l.id, l.order_id, l.item_id, l.quantity, l.unit_price, l.total_price, l.discount
        FROM order_lines l
        JOIN orders o ON o.id = l.order_id
        WHERE o.tenant_id = $1 AND l.order_id = ANY($2)
        ORDER BY l.order_id, l.id
        "#,
    )
    .bind(tenant_id)
    .bind(order_ids)
    .fetch_all(pool)
    .await?;
    Ok(lines)
}

pub async fn delete_lines(pool: &PgPool, tenant_id: &str, order_id: i64) -> StoreResult<u64> {
    let rows = sqlx::query(
        r#"
        DELETE FROM order_lines l
        USING orders o
        WHERE l.order_id = o.id AND o.tenant_id = $1 AND o.id = $2
        "#,
    )
    .bind(tenant_id)
    .bind(order_id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows)
}

// ── Status history ──

pub async fn append_history(
    pool: &PgPool,
    tenant_id: &str,
    order_id: i64,
    status: &OrderStatus,
    reason: Option<&str>,
) -> StoreResult<StatusHistoryEntry> {
    let entry = sqlx::query_as::<_, StatusHistoryEntry>(
        r#"
        INSERT INTO order_status_history (id, order_id, status, reason, created_at)
        SELECT $3, o.id, $4, $5, $6 FROM orders o WHERE o.tenant_id = $1 AND o.id = $2
        RETURNING id, order_id, status, reason, created_at
        "#,
    )
    .bind(tenant_id)
    .bind(order_id)
    .bind(snowflake_id())
    .bind(status.as_str())
    .bind(reason)
    .bind(now_millis())
    .fetch_optional(pool)
    .await?;
    entry.ok_or_else(|| StoreError::NotFound(format!("Order {order_id} not found")))
}

pub async fn list_history(
    pool: &PgPool,
    tenant_id: &str,
    order_id: i64,
) -> StoreResult<Vec<StatusHistoryEntry>> {
    let entries = sqlx::query_as::<_, StatusHistoryEntry>(
        r#"
        SELECT h.id, h.order_id, h.status, h.reason, h.created_at
        FROM order_status_history h
        JOIN orders o ON o.id = h.order_id
        WHERE o.tenant_id = $1 AND h.order_id = $2
        ORDER BY h.created_at, h.id
        "#,
    )
    .bind(tenant_id)
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

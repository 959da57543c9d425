//! Read of the denormalized `storefront_order_view`

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::storefront::{StorefrontCustomer, StorefrontOrder, StorefrontOrderItem, StorefrontShipping};
use sqlx::PgPool;
use sqlx::types::Json;

use crate::db::StoreResult;

#[derive(sqlx::FromRow)]
struct ViewRow {
    id: i64,
    order_number: String,
    external_order_id: String,
    order_date: DateTime<Utc>,
    status: String,
    total_amount: Decimal,
    payment_method: String,
    notes: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    shipping_address: String,
    shipping_city: String,
    shipping_postal_code: String,
    items: Json<Vec<StorefrontOrderItem>>,
}

impl From<ViewRow> for StorefrontOrder {
    fn from(row: ViewRow) -> Self {
        Self {
            id: row.id,
            order_number: row.order_number,
            external_order_id: row.external_order_id,
            order_date: row.order_date,
            status: row.status,
            total_amount: row.total_amount,
            payment_method: row.payment_method,
            notes: row.notes,
            customer: StorefrontCustomer {
                name: row.customer_name,
                email: row.customer_email,
                phone: row.customer_phone,
            },
            shipping: StorefrontShipping {
                address: row.shipping_address,
                city: row.shipping_city,
                postal_code: row.shipping_postal_code,
            },
            items: row.items.0,
        }
    }
}

pub async fn list(pool: &PgPool, tenant_id: &str, origin: &str) -> StoreResult<Vec<StorefrontOrder>> {
    let rows = sqlx::query_as::<_, ViewRow>(
        r#"
        SELECT id, order_number, external_order_id, order_date, status, total_amount,
               payment_method, notes, customer_name, customer_email, customer_phone,
               shipping_address, shipping_city, shipping_postal_code, items
        FROM storefront_order_view
        WHERE tenant_id = $1 AND origin = $2
        ORDER BY order_date DESC, id DESC
        "#,
    )
    .bind(tenant_id)
    .bind(origin)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(StorefrontOrder::from).collect())
}

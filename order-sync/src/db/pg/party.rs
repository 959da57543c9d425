//! Party database operations

use shared::models::{Party, PartyCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use crate::db::StoreResult;

const COLUMNS: &str = "id, tenant_id, name, email, phone, address, origin, created_at";

pub async fn find_by_email(pool: &PgPool, tenant_id: &str, email: &str) -> StoreResult<Option<Party>> {
    let party = sqlx::query_as::<_, Party>(&format!(
        "SELECT {COLUMNS} FROM parties WHERE tenant_id = $1 AND email = $2"
    ))
    .bind(tenant_id)
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(party)
}

pub async fn insert(pool: &PgPool, tenant_id: &str, data: PartyCreate) -> StoreResult<Party> {
    let party = sqlx::query_as::<_, Party>(&format!(
        r#"
        INSERT INTO parties (id, tenant_id, name, email, phone, address, origin, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(tenant_id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(&data.origin)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(party)
}

pub async fn find_many(pool: &PgPool, tenant_id: &str, ids: &[i64]) -> StoreResult<Vec<Party>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let parties = sqlx::query_as::<_, Party>(&format!(
        "SELECT {COLUMNS} FROM parties WHERE tenant_id = $1 AND id = ANY($2)"
    ))
    .bind(tenant_id)
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(parties)
}

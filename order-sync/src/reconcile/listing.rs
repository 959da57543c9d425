//! Storefront order listing
//!
//! The denormalized view is the fast path. When reading it fails the same
//! shape is rebuilt from the raw tables so listing stays available.

use std::collections::HashMap;

use shared::storefront::StorefrontOrder;

use crate::db::RecordStore;
use crate::error::SyncResult;

/// Orders with the given origin, newest first
pub async fn list(store: &dyn RecordStore, tenant_id: &str, origin: &str) -> SyncResult<Vec<StorefrontOrder>> {
    match store.list_order_view(tenant_id, origin).await {
        Ok(orders) => Ok(orders),
        Err(e) => {
            tracing::warn!(error = %e, "Order view read failed, falling back to raw tables");
            list_from_tables(store, tenant_id, origin).await
        }
    }
}

async fn list_from_tables(
    store: &dyn RecordStore,
    tenant_id: &str,
    origin: &str,
) -> SyncResult<Vec<StorefrontOrder>> {
    let headers = store.list_orders(tenant_id, origin).await?;
    if headers.is_empty() {
        return Ok(vec![]);
    }

    let order_ids: Vec<i64> = headers.iter().map(|h| h.id).collect();
    let mut party_ids: Vec<i64> = headers.iter().filter_map(|h| h.party_id).collect();
    party_ids.sort_unstable();
    party_ids.dedup();

    let parties: HashMap<i64, _> = store
        .find_parties(tenant_id, &party_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let lines = store.find_lines(tenant_id, &order_ids).await?;
    let mut item_ids: Vec<i64> = lines.iter().map(|l| l.item_id).collect();
    item_ids.sort_unstable();
    item_ids.dedup();
    let items: HashMap<i64, _> = store
        .find_items(tenant_id, &item_ids)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();

    let mut lines_by_order: HashMap<i64, Vec<_>> = HashMap::new();
    for line in &lines {
        lines_by_order
            .entry(line.order_id)
            .or_default()
            .push((line, items.get(&line.item_id)));
    }

    Ok(headers
        .iter()
        .map(|header| {
            let party = header.party_id.and_then(|id| parties.get(&id));
            let order_lines = lines_by_order.remove(&header.id).unwrap_or_default();
            StorefrontOrder::from_records(header, party, &order_lines)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FailPoint, MemoryStore};
    use crate::reconcile::test_support::{header_with_number, line, payload_on, service_with};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    async fn seeded() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone());
        let older = payload_on(
            "SHOP-1",
            "a@x.com",
            vec![line("P1", None, 2, 500)],
            Utc.with_ymd_and_hms(2026, 3, 13, 8, 0, 0).unwrap(),
        );
        let newer = payload_on(
            "SHOP-2",
            "b@x.com",
            vec![line("P1", None, 1, 500), line("P2", Some("BOLT"), 4, 25)],
            Utc.with_ymd_and_hms(2026, 3, 14, 8, 0, 0).unwrap(),
        );
        assert!(service.reconcile(older).await.success);
        assert!(service.reconcile(newer).await.success);
        store
    }

    #[tokio::test]
    async fn view_and_fallback_agree() {
        let store = seeded().await;
        let from_view = list(&*store, "t1", "storefront").await.unwrap();

        store.fail_on(FailPoint::OrderView);
        let from_tables = list(&*store, "t1", "storefront").await.unwrap();

        assert_eq!(from_view, from_tables);
        assert_eq!(from_tables.len(), 2);
        assert_eq!(from_tables[0].external_order_id, "SHOP-2");
        assert_eq!(from_tables[1].external_order_id, "SHOP-1");
        assert_eq!(from_tables[0].items.len(), 2);
        assert_eq!(from_tables[0].items[1].sku, "BOLT");
        assert_eq!(from_tables[0].customer.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn fallback_defaults_missing_nested_fields() {
        let store = MemoryStore::new();
        let mut header = header_with_number("SO20260314001");
        header.contact_email = Some("walk-in@x.com".into());
        store.insert_order("t1", header).await.unwrap();
        store.fail_on(FailPoint::OrderView);

        let orders = list(&store, "t1", "storefront").await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].customer.name, "");
        assert_eq!(orders[0].customer.email, "walk-in@x.com");
        assert_eq!(orders[0].customer.phone, "");
        assert_eq!(orders[0].notes, "");
        assert!(orders[0].items.is_empty());
    }

    #[tokio::test]
    async fn fallback_failure_is_reported() {
        let store = seeded().await;
        store.fail_on(FailPoint::OrderView);
        store.fail_on(FailPoint::FindParty);
        assert!(list(&*store, "t1", "storefront").await.is_err());
    }

    #[tokio::test]
    async fn other_origins_and_tenants_are_excluded() {
        let store = seeded().await;
        assert!(list(&*store, "t1", "pos").await.unwrap().is_empty());
        assert!(list(&*store, "t2", "storefront").await.unwrap().is_empty());
    }
}

//! End-to-end reconciliation flows against the in-memory store

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use common::{TENANT, order, service, settings};
use order_sync::db::{FailPoint, MemoryStore, RecordStore, StockAdjustment, StoreResult};
use order_sync::{ReconcileService, SyncError};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::json;
use shared::OrderStatus;
use shared::error::ErrorCode;
use shared::models::{
    CatalogItem, CatalogItemCreate, LedgerEntry, LedgerEntryCreate, OrderHeader,
    OrderHeaderCreate, OrderLine, OrderLineCreate, Party, PartyCreate, SALES_LEDGER_CATEGORY,
    StatusHistoryEntry,
};
use shared::storefront::StorefrontOrder;

#[tokio::test]
async fn fresh_order_creates_one_of_each_record() {
    let (store, service) = service();

    let outcome = service
        .reconcile(order(
            "SHOP-1001",
            "a@x.com",
            json!([{ "productId": "P1", "productName": "Brass gear", "quantity": 2, "unitPrice": 500, "totalPrice": 1000 }]),
        ))
        .await;

    assert!(outcome.success, "{outcome:?}");
    assert_eq!(outcome.order_number.as_deref(), Some("SO20260314001"));

    assert_eq!(store.parties().len(), 1);
    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].unit_cost, Decimal::from(350));
    let orders = store.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total_amount, Decimal::from(1000));
    assert_eq!(orders[0].tenant_id, TENANT);
    assert_eq!(orders[0].notes.as_deref(), Some("leave at the door"));
    let lines = store.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].total_price, Decimal::from(1000));
    assert_eq!(store.history().len(), 1);
}

#[tokio::test]
async fn repeat_customer_and_sku_reuse_records() {
    let (store, service) = service();
    let gear = |price: i64| {
        json!([{ "productId": "P1", "productName": "Brass gear", "sku": "GEAR-BR", "quantity": 1, "unitPrice": price, "totalPrice": price }])
    };

    assert!(service.reconcile(order("SHOP-1", "a@x.com", gear(500))).await.success);
    assert!(service.reconcile(order("SHOP-2", "a@x.com", gear(650))).await.success);

    assert_eq!(store.parties().len(), 1);
    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].unit_price, Decimal::from(500));
    assert_eq!(items[0].unit_cost, Decimal::from(350));
    assert_eq!(store.orders().len(), 2);
}

#[tokio::test]
async fn same_day_orders_get_increasing_numbers() {
    let (_, service) = service();
    let mut numbers = Vec::new();
    for n in 0..12 {
        let outcome = service
            .reconcile(order(
                &format!("SHOP-{n}"),
                &format!("c{n}@x.com"),
                json!([{ "productId": "P1", "productName": "Gear", "quantity": 1, "unitPrice": 10, "totalPrice": 10 }]),
            ))
            .await;
        numbers.push(outcome.order_number.expect("order number"));
    }

    assert!(numbers.windows(2).all(|w| w[0] < w[1]), "{numbers:?}");
    assert_eq!(numbers.last().map(String::as_str), Some("SO20260314012"));
}

#[tokio::test]
async fn forced_line_failure_leaves_no_header() {
    let (store, service) = service();
    store.fail_on(FailPoint::InsertLines);

    let outcome = service
        .reconcile(order(
            "SHOP-9",
            "a@x.com",
            json!([{ "productId": "P1", "productName": "Gear", "quantity": 1, "unitPrice": 10, "totalPrice": 10 }]),
        ))
        .await;

    assert!(!outcome.success);
    assert!(store.orders().is_empty());
    assert!(store.lines().is_empty());
    // party and catalog writes are not undone
    assert_eq!(store.parties().len(), 1);
    assert_eq!(store.items().len(), 1);

    // resubmitting after recovery succeeds with the same number
    store.clear_failures();
    let outcome = service
        .reconcile(order(
            "SHOP-9",
            "a@x.com",
            json!([{ "productId": "P1", "productName": "Gear", "quantity": 1, "unitPrice": 10, "totalPrice": 10 }]),
        ))
        .await;
    assert!(outcome.success);
    assert_eq!(outcome.order_number.as_deref(), Some("SO20260314001"));
    assert_eq!(store.items().len(), 1);
}

#[tokio::test]
async fn lifecycle_from_placement_to_deletion() {
    let (store, service) = service();
    let outcome = service
        .reconcile(order(
            "SHOP-77",
            "a@x.com",
            json!([
                { "productId": "P1", "productName": "Gear", "quantity": 3, "unitPrice": 100, "totalPrice": 300 },
                { "productId": "P2", "productName": "Bolt", "quantity": 10, "unitPrice": 2, "totalPrice": 20 }
            ]),
        ))
        .await;
    let order_id: i64 = outcome.order_id.expect("order id").parse().expect("numeric id");
    let number = outcome.order_number.expect("order number");

    for phrase in ["Order Confirmed", "Ship", "Deliver", "Deliver"] {
        service.update_status(order_id, phrase, None).await.expect("status update");
    }

    assert_eq!(store.orders()[0].status(), OrderStatus::Delivered);
    let mut quantities: Vec<i64> = store.items().iter().map(|i| i.quantity).collect();
    quantities.sort_unstable();
    assert_eq!(quantities, vec![9999 - 10, 9999 - 3]);

    let ledger = store
        .find_ledger_entry(TENANT, SALES_LEDGER_CATEGORY, &number)
        .await
        .unwrap()
        .expect("sales entry");
    assert_eq!(ledger.amount, Decimal::from(320));
    assert_eq!(store.ledger().len(), 1);

    let history = service.status_history(order_id).await.unwrap();
    let statuses: Vec<&str> = history.iter().map(|h| h.status.as_str()).collect();
    assert_eq!(statuses, ["pending", "confirmed", "shipped", "delivered", "delivered"]);

    service.delete_order(order_id).await.unwrap();
    assert!(store.orders().is_empty());
    assert!(store.lines().is_empty());
    assert!(store.ledger().is_empty());
    assert!(store.history().is_empty());
    // catalog and customer survive the order
    assert_eq!(store.items().len(), 2);
    assert_eq!(store.parties().len(), 1);

    assert!(service.delete_order(order_id).await.is_err());
}

#[tokio::test]
async fn listing_survives_view_failure() {
    let (store, service) = service();
    service
        .reconcile(order(
            "SHOP-5",
            "a@x.com",
            json!([{ "productId": "P1", "productName": "Gear", "quantity": 1, "unitPrice": 10, "totalPrice": 10 }]),
        ))
        .await;

    let from_view = service.list_orders().await.unwrap();
    store.fail_on(FailPoint::OrderView);
    let fallback = service.list_orders().await.unwrap();

    assert_eq!(from_view, fallback);
    assert_eq!(fallback[0].customer.name, "Grace Hopper");
    assert_eq!(fallback[0].shipping.city, "Arlington");
    assert_eq!(fallback[0].items[0].product_name, "Gear");
}

/// Store where another writer commits `number` right after the allocator
/// has read the latest order number.
struct RacingStore {
    inner: Arc<MemoryStore>,
    racing_number: Mutex<Option<String>>,
}

#[async_trait]
impl RecordStore for RacingStore {
    async fn latest_order_number(&self, tenant_id: &str, prefix: &str) -> StoreResult<Option<String>> {
        let seen = self.inner.latest_order_number(tenant_id, prefix).await?;
        let racing = self.racing_number.lock().take();
        if let Some(number) = racing {
            self.inner
                .insert_order(
                    tenant_id,
                    OrderHeaderCreate {
                        order_number: number,
                        party_id: None,
                        external_order_id: None,
                        order_date: Utc.with_ymd_and_hms(2026, 3, 14, 9, 29, 0).unwrap(),
                        total_amount: Decimal::from(5),
                        status: OrderStatus::Pending,
                        payment_method: "cash".into(),
                        notes: None,
                        origin: "pos".into(),
                        shipping_address: None,
                        shipping_city: None,
                        shipping_postal_code: None,
                        contact_email: None,
                        contact_phone: None,
                    },
                )
                .await?;
        }
        Ok(seen)
    }

    async fn find_party_by_email(&self, t: &str, email: &str) -> StoreResult<Option<Party>> {
        self.inner.find_party_by_email(t, email).await
    }
    async fn insert_party(&self, t: &str, data: PartyCreate) -> StoreResult<Party> {
        self.inner.insert_party(t, data).await
    }
    async fn find_parties(&self, t: &str, ids: &[i64]) -> StoreResult<Vec<Party>> {
        self.inner.find_parties(t, ids).await
    }
    async fn find_item_by_sku(&self, t: &str, sku: &str) -> StoreResult<Option<CatalogItem>> {
        self.inner.find_item_by_sku(t, sku).await
    }
    async fn insert_item(&self, t: &str, data: CatalogItemCreate) -> StoreResult<CatalogItem> {
        self.inner.insert_item(t, data).await
    }
    async fn find_items(&self, t: &str, ids: &[i64]) -> StoreResult<Vec<CatalogItem>> {
        self.inner.find_items(t, ids).await
    }
    async fn find_order(&self, t: &str, id: i64) -> StoreResult<Option<OrderHeader>> {
        self.inner.find_order(t, id).await
    }
    async fn find_order_by_external_id(
        &self,
        t: &str,
        origin: &str,
        external: &str,
    ) -> StoreResult<Option<OrderHeader>> {
        self.inner.find_order_by_external_id(t, origin, external).await
    }
    async fn insert_order(&self, t: &str, data: OrderHeaderCreate) -> StoreResult<OrderHeader> {
        self.inner.insert_order(t, data).await
    }
    async fn update_order_status(&self, t: &str, id: i64, status: &OrderStatus) -> StoreResult<()> {
        self.inner.update_order_status(t, id, status).await
    }
    async fn delete_order(&self, t: &str, id: i64) -> StoreResult<bool> {
        self.inner.delete_order(t, id).await
    }
    async fn list_orders(&self, t: &str, origin: &str) -> StoreResult<Vec<OrderHeader>> {
        self.inner.list_orders(t, origin).await
    }
    async fn insert_lines(&self, t: &str, id: i64, lines: &[OrderLineCreate]) -> StoreResult<Vec<OrderLine>> {
        self.inner.insert_lines(t, id, lines).await
    }
    async fn find_lines(&self, t: &str, ids: &[i64]) -> StoreResult<Vec<OrderLine>> {
        self.inner.find_lines(t, ids).await
    }
    async fn delete_lines(&self, t: &str, id: i64) -> StoreResult<u64> {
        self.inner.delete_lines(t, id).await
    }
    async fn append_status_history(
        &self,
        t: &str,
        id: i64,
        status: &OrderStatus,
        reason: Option<&str>,
    ) -> StoreResult<StatusHistoryEntry> {
        self.inner.append_status_history(t, id, status, reason).await
    }
    async fn list_status_history(&self, t: &str, id: i64) -> StoreResult<Vec<StatusHistoryEntry>> {
        self.inner.list_status_history(t, id).await
    }
    async fn find_ledger_entry(&self, t: &str, category: &str, reference: &str) -> StoreResult<Option<LedgerEntry>> {
        self.inner.find_ledger_entry(t, category, reference).await
    }
    async fn record_delivery(
        &self,
        t: &str,
        adjustments: &[StockAdjustment],
        entry: LedgerEntryCreate,
    ) -> StoreResult<Option<LedgerEntry>> {
        self.inner.record_delivery(t, adjustments, entry).await
    }
    async fn delete_ledger_entries(&self, t: &str, category: &str, reference: &str) -> StoreResult<u64> {
        self.inner.delete_ledger_entries(t, category, reference).await
    }
    async fn list_order_view(&self, t: &str, origin: &str) -> StoreResult<Vec<StorefrontOrder>> {
        self.inner.list_order_view(t, origin).await
    }
}

#[tokio::test]
async fn number_taken_by_concurrent_writer_fails_then_resubmit_moves_on() {
    let inner = Arc::new(MemoryStore::new());
    let racing = Arc::new(RacingStore {
        inner: inner.clone(),
        racing_number: Mutex::new(Some("SO20260314001".into())),
    });
    let service = ReconcileService::new(racing, settings());
    let submission = order(
        "SHOP-RACE",
        "a@x.com",
        json!([{ "productId": "P1", "productName": "Gear", "quantity": 1, "unitPrice": 10, "totalPrice": 10 }]),
    );

    let err = service.try_reconcile(&submission).await.unwrap_err();
    assert!(matches!(err, SyncError::Header(_)), "{err:?}");
    assert_eq!(err.code(), ErrorCode::OrderNumberConflict);

    // only the other writer's header exists; nothing was retried
    let orders = inner.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].origin, "pos");
    assert!(inner.lines().is_empty());

    let outcome = service.reconcile(submission).await;
    assert!(outcome.success, "{outcome:?}");
    assert_eq!(outcome.order_number.as_deref(), Some("SO20260314002"));
    assert_eq!(inner.orders().len(), 2);
}

#[tokio::test]
async fn delivery_failure_is_retryable_and_books_once() {
    let (store, service) = service();
    let outcome = service
        .reconcile(order(
            "SHOP-88",
            "a@x.com",
            json!([{ "productId": "P1", "productName": "Gear", "quantity": 3, "unitPrice": 100, "totalPrice": 300 }]),
        ))
        .await;
    let order_id: i64 = outcome.order_id.expect("order id").parse().expect("numeric id");
    service.update_status(order_id, "Ship", None).await.unwrap();

    store.fail_on(FailPoint::RecordDelivery);
    let err = service.update_status(order_id, "Deliver", None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::StoreUnavailable);
    assert_eq!(store.orders()[0].status(), OrderStatus::Shipped);
    assert!(store.ledger().is_empty());
    assert_eq!(store.items()[0].quantity, 9999);

    store.clear_failures();
    service.update_status(order_id, "Deliver", None).await.unwrap();

    assert_eq!(store.orders()[0].status(), OrderStatus::Delivered);
    assert_eq!(store.ledger().len(), 1);
    assert_eq!(store.ledger()[0].amount, Decimal::from(300));
    assert_eq!(store.items()[0].quantity, 9999 - 3);
}

//! Helpers shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use order_sync::db::MemoryStore;
use order_sync::{ReconcileService, SyncSettings};
use serde_json::{Value, json};
use shared::StorefrontOrderPayload;

pub const TENANT: &str = "acme";

pub fn settings() -> SyncSettings {
    SyncSettings {
        tenant_id: TENANT.into(),
        ..SyncSettings::default()
    }
}

pub fn service() -> (Arc<MemoryStore>, ReconcileService) {
    let store = Arc::new(MemoryStore::new());
    let service = ReconcileService::new(store.clone(), settings());
    (store, service)
}

/// Storefront order body as the storefront sends it
pub fn order_json(order_id: &str, email: &str, items: Value) -> Value {
    let total: f64 = items
        .as_array()
        .map(|items| items.iter().filter_map(|i| i["totalPrice"].as_f64()).sum())
        .unwrap_or_default();
    json!({
        "orderId": order_id,
        "customerInfo": {
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": email,
            "phone": "+1 555 0100",
            "address": "1 Compiler Way",
            "city": "Arlington",
            "state": "VA",
            "postalCode": "22201",
            "country": "US"
        },
        "items": items,
        "totalAmount": total,
        "paymentMethod": "card",
        "orderDate": "2026-03-14T09:30:00Z",
        "notes": "leave at the door"
    })
}

pub fn order(order_id: &str, email: &str, items: Value) -> StorefrontOrderPayload {
    serde_json::from_value(order_json(order_id, email, items)).expect("valid payload")
}

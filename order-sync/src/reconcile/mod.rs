//! Storefront order reconciliation pipeline
//!
//! One inbound storefront order runs top to bottom through:
//!
//! ```text
//! payload ─► validate ─► replay check ─► party ─► catalog ─► sequence ─► assembler
//! ```
//!
//! Each step is an awaited call on the [`RecordStore`]; nothing is cached
//! between runs. Concurrent runs are arbitrated by the store's unique
//! constraints: a losing writer gets a hard failure and the caller resubmits.
//!
//! Later lifecycle events go through [`ReconcileService::update_status`] and
//! [`ReconcileService::delete_order`]; listings through
//! [`ReconcileService::list_orders`].

pub mod assembler;
pub mod catalog;
pub mod listing;
pub mod party;
pub mod sequence;
pub mod status;

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{OrderStatus, StatusHistoryEntry};
use shared::storefront::{ReconcileOutcome, StorefrontOrder, StorefrontOrderPayload};
use validator::Validate;

use crate::config::Config;
use crate::db::RecordStore;
use crate::error::{SyncError, SyncResult};

/// Fixed per-deployment settings of the pipeline
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub tenant_id: String,
    pub order_number_prefix: String,
    pub origin: String,
    pub default_stock: i64,
    pub cost_ratio: Decimal,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            tenant_id: "default".into(),
            order_number_prefix: "SO".into(),
            origin: "storefront".into(),
            default_stock: 9999,
            cost_ratio: Decimal::new(7, 1),
        }
    }
}

impl From<&Config> for SyncSettings {
    fn from(config: &Config) -> Self {
        Self {
            tenant_id: config.tenant_id.clone(),
            order_number_prefix: config.order_number_prefix.clone(),
            origin: config.order_origin.clone(),
            default_stock: config.default_stock,
            cost_ratio: config.cost_ratio,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledOrder {
    pub order_id: i64,
    pub order_number: String,
    /// The external order id was already reconciled; nothing was written
    pub replayed: bool,
}

/// Outbound outcome of one run, with the typed cause when it failed
#[derive(Debug)]
pub struct ReconcileReport {
    pub outcome: ReconcileOutcome,
    pub error: Option<SyncError>,
}

fn conclude(external_id: &str, result: SyncResult<ReconciledOrder>) -> ReconcileReport {
    match result {
        Ok(order) => ReconcileReport {
            outcome: ReconcileOutcome::succeeded(order.order_id, order.order_number),
            error: None,
        },
        Err(e) => {
            if matches!(e, SyncError::Validation(_)) {
                tracing::warn!(external_order_id = %external_id, error = %e, "Storefront order rejected");
            } else {
                tracing::error!(external_order_id = %external_id, code = %e.code(), error = %e, "Storefront order reconciliation failed");
            }
            ReconcileReport {
                outcome: ReconcileOutcome::failed(e.to_string()),
                error: Some(e),
            }
        }
    }
}

/// Reconciliation facade
#[derive(Clone)]
pub struct ReconcileService {
    store: Arc<dyn RecordStore>,
    settings: SyncSettings,
}

impl ReconcileService {
    pub fn new(store: Arc<dyn RecordStore>, settings: SyncSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Reconcile one storefront order. Never fails: errors become a failed outcome.
    pub async fn reconcile(&self, payload: StorefrontOrderPayload) -> ReconcileOutcome {
        let result = self.try_reconcile(&payload).await;
        conclude(&payload.order_id, result).outcome
    }

    /// Reconcile a raw JSON body as pushed by the storefront.
    ///
    /// A body that does not parse fails like any other invalid payload.
    pub async fn reconcile_json(&self, body: &[u8]) -> ReconcileReport {
        match serde_json::from_slice::<StorefrontOrderPayload>(body) {
            Ok(payload) => {
                let result = self.try_reconcile(&payload).await;
                conclude(&payload.order_id, result)
            }
            Err(e) => conclude("", Err(SyncError::Validation(e.to_string()))),
        }
    }

    /// Run the pipeline, keeping the typed error
    pub async fn try_reconcile(&self, payload: &StorefrontOrderPayload) -> SyncResult<ReconciledOrder> {
        payload
            .validate()
            .map_err(|e| SyncError::Validation(e.to_string()))?;
        let mut payload = payload.clone();
        payload.round_amounts();
        let payload = &payload;

        let store = self.store.as_ref();
        let settings = &self.settings;
        let external_id = payload.order_id.trim();

        if let Some(existing) = store
            .find_order_by_external_id(&settings.tenant_id, &settings.origin, external_id)
            .await?
        {
            tracing::info!(
                external_order_id = %external_id,
                order_id = existing.id,
                order_number = %existing.order_number,
                "Storefront order already reconciled"
            );
            return Ok(ReconciledOrder {
                order_id: existing.id,
                order_number: existing.order_number,
                replayed: true,
            });
        }

        let party_id =
            party::resolve(store, &settings.tenant_id, &settings.origin, &payload.customer_info)
                .await?;
        let catalog = catalog::resolve(store, settings, &payload.items).await?;
        let order_number = sequence::allocate(
            store,
            &settings.tenant_id,
            &settings.order_number_prefix,
            payload.order_date.date_naive(),
        )
        .await;
        let header =
            assembler::assemble(store, settings, &order_number, party_id, payload, &catalog).await?;

        tracing::info!(
            external_order_id = %external_id,
            order_id = header.id,
            order_number = %header.order_number,
            party_id,
            catalog_items = catalog.len(),
            "Storefront order reconciled"
        );
        Ok(ReconciledOrder {
            order_id: header.id,
            order_number: header.order_number,
            replayed: false,
        })
    }

    pub async fn update_status(
        &self,
        order_id: i64,
        external_status: &str,
        reason: Option<&str>,
    ) -> SyncResult<OrderStatus> {
        status::update_status(
            self.store.as_ref(),
            &self.settings.tenant_id,
            order_id,
            external_status,
            reason,
        )
        .await
    }

    pub async fn delete_order(&self, order_id: i64) -> SyncResult<()> {
        assembler::delete(self.store.as_ref(), &self.settings.tenant_id, order_id).await
    }

    pub async fn list_orders(&self) -> SyncResult<Vec<StorefrontOrder>> {
        listing::list(self.store.as_ref(), &self.settings.tenant_id, &self.settings.origin).await
    }

    pub async fn status_history(&self, order_id: i64) -> SyncResult<Vec<StatusHistoryEntry>> {
        let tenant_id = &self.settings.tenant_id;
        if self.store.find_order(tenant_id, order_id).await?.is_none() {
            return Err(SyncError::OrderNotFound(order_id));
        }
        Ok(self.store.list_status_history(tenant_id, order_id).await?)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use shared::models::{OrderHeaderCreate, OrderStatus};
    use shared::storefront::{CustomerInfo, StorefrontLineItem, StorefrontOrderPayload};

    use super::{ReconcileService, SyncSettings};
    use crate::db::MemoryStore;

    pub fn settings() -> SyncSettings {
        SyncSettings {
            tenant_id: "t1".into(),
            ..SyncSettings::default()
        }
    }

    pub fn service_with(store: Arc<MemoryStore>) -> ReconcileService {
        ReconcileService::new(store, settings())
    }

    pub fn customer(email: &str) -> CustomerInfo {
        CustomerInfo {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            phone: "+44 20 0000".into(),
            address: "12 Analytical Row".into(),
            city: "London".into(),
            state: "Greater London".into(),
            postal_code: "N1 9GU".into(),
            country: "UK".into(),
        }
    }

    pub fn line(product_id: &str, sku: Option<&str>, quantity: i32, unit_price: i64) -> StorefrontLineItem {
        StorefrontLineItem {
            product_id: product_id.into(),
            product_name: format!("Product {product_id}"),
            sku: sku.map(str::to_string),
            quantity,
            unit_price: Decimal::from(unit_price),
            total_price: Decimal::from(unit_price * i64::from(quantity)),
        }
    }

    pub fn payload_on(
        order_id: &str,
        email: &str,
        items: Vec<StorefrontLineItem>,
        order_date: DateTime<Utc>,
    ) -> StorefrontOrderPayload {
        StorefrontOrderPayload {
            order_id: order_id.into(),
            customer_info: customer(email),
            total_amount: items.iter().map(|i| i.total_price).sum(),
            items,
            payment_method: "card".into(),
            order_date,
            notes: None,
        }
    }

    pub fn payload(order_id: &str, email: &str, items: Vec<StorefrontLineItem>) -> StorefrontOrderPayload {
        payload_on(
            order_id,
            email,
            items,
            Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
        )
    }

    pub fn header_with_number(number: &str) -> OrderHeaderCreate {
        OrderHeaderCreate {
            order_number: number.into(),
            party_id: None,
            external_order_id: None,
            order_date: Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap(),
            total_amount: Decimal::from(10),
            status: OrderStatus::Pending,
            payment_method: "cash".into(),
            notes: None,
            origin: "storefront".into(),
            shipping_address: None,
            shipping_city: None,
            shipping_postal_code: None,
            contact_email: None,
            contact_phone: None,
        }
    }
}

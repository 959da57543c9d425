//! In-memory record store
//!
//! Mirrors the PostgreSQL schema's uniqueness rules so the pipeline behaves
//! the same against it. Used for local dry runs and by the test suites;
//! [`FailPoint`]s let a caller make a single operation fail on demand.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{
    CatalogItem, CatalogItemCreate, LedgerEntry, LedgerEntryCreate, OrderHeader,
    OrderHeaderCreate, OrderLine, OrderLineCreate, OrderStatus, Party, PartyCreate,
    StatusHistoryEntry,
};
use shared::storefront::StorefrontOrder;
use shared::util::{now_millis, snowflake_id};

use super::{RecordStore, StockAdjustment, StoreError, StoreResult};

/// Store operation that can be forced to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    FindParty,
    InsertParty,
    FindItem,
    InsertItem,
    LatestOrderNumber,
    FindOrder,
    InsertOrder,
    UpdateStatus,
    DeleteOrder,
    InsertLines,
    DeleteLines,
    AppendHistory,
    RecordDelivery,
    DeleteLedger,
    OrderView,
}

#[derive(Default)]
struct Tables {
    parties: Vec<Party>,
    items: Vec<CatalogItem>,
    orders: Vec<OrderHeader>,
    lines: Vec<OrderLine>,
    history: Vec<StatusHistoryEntry>,
    ledger: Vec<LedgerEntry>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failures: Mutex<HashSet<FailPoint>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `point` fail with `StoreError::Unavailable`
    pub fn fail_on(&self, point: FailPoint) {
        self.failures.lock().insert(point);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    fn check(&self, point: FailPoint) -> StoreResult<()> {
        if self.failures.lock().contains(&point) {
            return Err(StoreError::Unavailable(format!("{point:?} failed")));
        }
        Ok(())
    }

    // ── Inspection helpers ──

    pub fn parties(&self) -> Vec<Party> {
        self.tables.lock().parties.clone()
    }

    pub fn items(&self) -> Vec<CatalogItem> {
        self.tables.lock().items.clone()
    }

    pub fn orders(&self) -> Vec<OrderHeader> {
        self.tables.lock().orders.clone()
    }

    pub fn lines(&self) -> Vec<OrderLine> {
        self.tables.lock().lines.clone()
    }

    pub fn history(&self) -> Vec<StatusHistoryEntry> {
        self.tables.lock().history.clone()
    }

    pub fn ledger(&self) -> Vec<LedgerEntry> {
        self.tables.lock().ledger.clone()
    }
}

impl Tables {
    fn owns_order(&self, tenant_id: &str, order_id: i64) -> bool {
        self.orders
            .iter()
            .any(|o| o.id == order_id && o.tenant_id == tenant_id)
    }
}

/// Numeric order for order numbers sharing a prefix: longer suffix wins, then lexical
fn number_rank(number: &str) -> (usize, &str) {
    (number.len(), number)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_party_by_email(
        &self,
        tenant_id: &str,
        email: &str,
    ) -> StoreResult<Option<Party>> {
        self.check(FailPoint::FindParty)?;
        let tables = self.tables.lock();
        Ok(tables
            .parties
            .iter()
            .find(|p| p.tenant_id == tenant_id && p.email == email)
            .cloned())
    }

    async fn insert_party(&self, tenant_id: &str, data: PartyCreate) -> StoreResult<Party> {
        self.check(FailPoint::InsertParty)?;
        let mut tables = self.tables.lock();
        if tables
            .parties
            .iter()
            .any(|p| p.tenant_id == tenant_id && p.email == data.email)
        {
            return Err(StoreError::Duplicate(format!(
                "party email {} already exists",
                data.email
            )));
        }
        let party = Party {
            id: snowflake_id(),
            tenant_id: tenant_id.to_string(),
            name: data.name,
            email: data.email,
            phone: data.phone,
            address: data.address,
            origin: data.origin,
            created_at: now_millis(),
        };
        tables.parties.push(party.clone());
        Ok(party)
    }

    async fn find_parties(&self, tenant_id: &str, ids: &[i64]) -> StoreResult<Vec<Party>> {
        self.check(FailPoint::FindParty)?;
        let tables = self.tables.lock();
        Ok(tables
            .parties
            .iter()
            .filter(|p| p.tenant_id == tenant_id && ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_item_by_sku(
        &self,
        tenant_id: &str,
        sku: &str,
    ) -> StoreResult<Option<CatalogItem>> {
        self.check(FailPoint::FindItem)?;
        let tables = self.tables.lock();
        Ok(tables
            .items
            .iter()
            .find(|i| i.tenant_id == tenant_id && i.sku == sku)
            .cloned())
    }

    async fn insert_item(
        &self,
        tenant_id: &str,
        data: CatalogItemCreate,
    ) -> StoreResult<CatalogItem> {
        self.check(FailPoint::InsertItem)?;
        let mut tables = self.tables.lock();
        if tables
            .items
            .iter()
            .any(|i| i.tenant_id == tenant_id && i.sku == data.sku)
        {
            return Err(StoreError::Duplicate(format!(
                "catalog sku {} already exists",
                data.sku
            )));
        }
        let item = CatalogItem {
            id: snowflake_id(),
            tenant_id: tenant_id.to_string(),
            name: data.name,
            sku: data.sku,
            unit_cost: data.unit_cost,
            unit_price: data.unit_price,
            quantity: data.quantity,
            is_active: data.is_active,
            is_storefront_item: data.is_storefront_item,
            created_at: now_millis(),
        };
        tables.items.push(item.clone());
        Ok(item)
    }

    async fn find_items(&self, tenant_id: &str, ids: &[i64]) -> StoreResult<Vec<CatalogItem>> {
        self.check(FailPoint::FindItem)?;
        let tables = self.tables.lock();
        Ok(tables
            .items
            .iter()
            .filter(|i| i.tenant_id == tenant_id && ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn latest_order_number(
        &self,
        tenant_id: &str,
        prefix: &str,
    ) -> StoreResult<Option<String>> {
        self.check(FailPoint::LatestOrderNumber)?;
        let tables = self.tables.lock();
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.tenant_id == tenant_id && o.order_number.starts_with(prefix))
            .map(|o| o.order_number.as_str())
            .max_by(|a, b| number_rank(a).cmp(&number_rank(b)))
            .map(str::to_string))
    }

    async fn find_order(&self, tenant_id: &str, order_id: i64) -> StoreResult<Option<OrderHeader>> {
        self.check(FailPoint::FindOrder)?;
        let tables = self.tables.lock();
        Ok(tables
            .orders
            .iter()
            .find(|o| o.tenant_id == tenant_id && o.id == order_id)
            .cloned())
    }

    async fn find_order_by_external_id(
        &self,
        tenant_id: &str,
        origin: &str,
        external_order_id: &str,
    ) -> StoreResult<Option<OrderHeader>> {
        self.check(FailPoint::FindOrder)?;
        let tables = self.tables.lock();
        Ok(tables
            .orders
            .iter()
            .find(|o| {
                o.tenant_id == tenant_id
                    && o.origin == origin
                    && o.external_order_id.as_deref() == Some(external_order_id)
            })
            .cloned())
    }

    async fn insert_order(
        &self,
        tenant_id: &str,
        data: OrderHeaderCreate,
    ) -> StoreResult<OrderHeader> {
        self.check(FailPoint::InsertOrder)?;
        let mut tables = self.tables.lock();
        if tables
            .orders
            .iter()
            .any(|o| o.tenant_id == tenant_id && o.order_number == data.order_number)
        {
            return Err(StoreError::Duplicate(format!(
                "order number {} already exists",
                data.order_number
            )));
        }
        if let Some(external_id) = data.external_order_id.as_deref()
            && tables.orders.iter().any(|o| {
                o.tenant_id == tenant_id
                    && o.origin == data.origin
                    && o.external_order_id.as_deref() == Some(external_id)
            })
        {
            return Err(StoreError::Duplicate(format!(
                "external order {external_id} already exists"
            )));
        }
        let order = OrderHeader {
            id: snowflake_id(),
            tenant_id: tenant_id.to_string(),
            order_number: data.order_number,
            party_id: data.party_id,
            external_order_id: data.external_order_id,
            order_date: data.order_date,
            total_amount: data.total_amount,
            status: data.status.as_str().to_string(),
            payment_method: data.payment_method,
            notes: data.notes,
            origin: data.origin,
            shipping_address: data.shipping_address,
            shipping_city: data.shipping_city,
            shipping_postal_code: data.shipping_postal_code,
            contact_email: data.contact_email,
            contact_phone: data.contact_phone,
            created_at: now_millis(),
        };
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn update_order_status(
        &self,
        tenant_id: &str,
        order_id: i64,
        status: &OrderStatus,
    ) -> StoreResult<()> {
        self.check(FailPoint::UpdateStatus)?;
        let mut tables = self.tables.lock();
        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.tenant_id == tenant_id && o.id == order_id)
            .ok_or_else(|| StoreError::NotFound(format!("Order {order_id} not found")))?;
        order.status = status.as_str().to_string();
        Ok(())
    }

    async fn delete_order(&self, tenant_id: &str, order_id: i64) -> StoreResult<bool> {
        self.check(FailPoint::DeleteOrder)?;
        let mut tables = self.tables.lock();
        let before = tables.orders.len();
        tables
            .orders
            .retain(|o| !(o.tenant_id == tenant_id && o.id == order_id));
        let removed = tables.orders.len() < before;
        if removed {
            // history rows cascade with the header
            tables.history.retain(|h| h.order_id != order_id);
        }
        Ok(removed)
    }

    async fn list_orders(&self, tenant_id: &str, origin: &str) -> StoreResult<Vec<OrderHeader>> {
        self.check(FailPoint::FindOrder)?;
        let tables = self.tables.lock();
        let mut orders: Vec<OrderHeader> = tables
            .orders
            .iter()
            .filter(|o| o.tenant_id == tenant_id && o.origin == origin)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn insert_lines(
        &self,
        tenant_id: &str,
        order_id: i64,
        lines: &[OrderLineCreate],
    ) -> StoreResult<Vec<OrderLine>> {
        self.check(FailPoint::InsertLines)?;
        let mut tables = self.tables.lock();
        if !tables.owns_order(tenant_id, order_id) {
            return Err(StoreError::NotFound(format!("Order {order_id} not found")));
        }
        if let Some(missing) = lines
            .iter()
            .find(|l| !tables.items.iter().any(|i| i.id == l.item_id))
        {
            return Err(StoreError::Database(format!(
                "catalog item {} does not exist",
                missing.item_id
            )));
        }
        let created: Vec<OrderLine> = lines
            .iter()
            .map(|l| OrderLine {
                id: snowflake_id(),
                order_id,
                item_id: l.item_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
                total_price: l.total_price,
                discount: l.discount,
            })
            .collect();
        tables.lines.extend(created.iter().cloned());
        Ok(created)
    }

    async fn find_lines(&self, tenant_id: &str, order_ids: &[i64]) -> StoreResult<Vec<OrderLine>> {
        let tables = self.tables.lock();
        Ok(tables
            .lines
            .iter()
            .filter(|l| order_ids.contains(&l.order_id) && tables.owns_order(tenant_id, l.order_id))
            .cloned()
            .collect())
    }

    async fn delete_lines(&self, tenant_id: &str, order_id: i64) -> StoreResult<u64> {
        self.check(FailPoint::DeleteLines)?;
        let mut tables = self.tables.lock();
        if !tables.owns_order(tenant_id, order_id) {
            return Ok(0);
        }
        let before = tables.lines.len();
        tables.lines.retain(|l| l.order_id != order_id);
        Ok((before - tables.lines.len()) as u64)
    }

    async fn append_status_history(
        &self,
        tenant_id: &str,
        order_id: i64,
        status: &OrderStatus,
        reason: Option<&str>,
    ) -> StoreResult<StatusHistoryEntry> {
        self.check(FailPoint::AppendHistory)?;
        let mut tables = self.tables.lock();
        if !tables.owns_order(tenant_id, order_id) {
            return Err(StoreError::NotFound(format!("Order {order_id} not found")));
        }
        let entry = StatusHistoryEntry {
            id: snowflake_id(),
            order_id,
            status: status.as_str().to_string(),
            reason: reason.map(str::to_string),
            created_at: now_millis(),
        };
        tables.history.push(entry.clone());
        Ok(entry)
    }

    async fn list_status_history(
        &self,
        tenant_id: &str,
        order_id: i64,
    ) -> StoreResult<Vec<StatusHistoryEntry>> {
        let tables = self.tables.lock();
        if !tables.owns_order(tenant_id, order_id) {
            return Ok(vec![]);
        }
        Ok(tables
            .history
            .iter()
            .filter(|h| h.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn find_ledger_entry(
        &self,
        tenant_id: &str,
        category: &str,
        reference: &str,
    ) -> StoreResult<Option<LedgerEntry>> {
        let tables = self.tables.lock();
        Ok(tables
            .ledger
            .iter()
            .find(|e| e.tenant_id == tenant_id && e.category == category && e.reference == reference)
            .cloned())
    }

    async fn record_delivery(
        &self,
        tenant_id: &str,
        adjustments: &[StockAdjustment],
        data: LedgerEntryCreate,
    ) -> StoreResult<Option<LedgerEntry>> {
        self.check(FailPoint::RecordDelivery)?;
        let mut tables = self.tables.lock();
        let booked = tables.ledger.iter().any(|e| {
            e.tenant_id == tenant_id && e.category == data.category && e.reference == data.reference
        });
        if booked {
            return Ok(None);
        }

        let mut positions = Vec::with_capacity(adjustments.len());
        for adj in adjustments {
            let pos = tables
                .items
                .iter()
                .position(|i| i.tenant_id == tenant_id && i.id == adj.item_id)
                .ok_or_else(|| StoreError::NotFound(format!("Catalog item {} not found", adj.item_id)))?;
            positions.push((pos, adj.delta));
        }
        for (pos, delta) in positions {
            tables.items[pos].quantity += delta;
        }

        let entry = LedgerEntry {
            id: snowflake_id(),
            tenant_id: tenant_id.to_string(),
            kind: data.kind.as_str().to_string(),
            amount: data.amount,
            category: data.category,
            reference: data.reference,
            entry_date: data.entry_date,
            created_at: now_millis(),
        };
        tables.ledger.push(entry.clone());
        Ok(Some(entry))
    }

    async fn delete_ledger_entries(
        &self,
        tenant_id: &str,
        category: &str,
        reference: &str,
    ) -> StoreResult<u64> {
        self.check(FailPoint::DeleteLedger)?;
        let mut tables = self.tables.lock();
        let before = tables.ledger.len();
        tables.ledger.retain(|e| {
            !(e.tenant_id == tenant_id && e.category == category && e.reference == reference)
        });
        Ok((before - tables.ledger.len()) as u64)
    }

    async fn list_order_view(
        &self,
        tenant_id: &str,
        origin: &str,
    ) -> StoreResult<Vec<StorefrontOrder>> {
        self.check(FailPoint::OrderView)?;
        let tables = self.tables.lock();
        let mut headers: Vec<&OrderHeader> = tables
            .orders
            .iter()
            .filter(|o| o.tenant_id == tenant_id && o.origin == origin)
            .collect();
        headers.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));

        Ok(headers
            .into_iter()
            .map(|header| {
                let party = header
                    .party_id
                    .and_then(|id| tables.parties.iter().find(|p| p.id == id));
                let lines: Vec<_> = tables
                    .lines
                    .iter()
                    .filter(|l| l.order_id == header.id)
                    .map(|l| (l, tables.items.iter().find(|i| i.id == l.item_id)))
                    .collect();
                StorefrontOrder::from_records(header, party, &lines)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use shared::models::LedgerEntryKind;

    fn header(number: &str, external: Option<&str>) -> OrderHeaderCreate {
        OrderHeaderCreate {
            order_number: number.to_string(),
            party_id: None,
            external_order_id: external.map(str::to_string),
            order_date: Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap(),
            total_amount: Decimal::from(10),
            status: OrderStatus::Pending,
            payment_method: "card".into(),
            notes: None,
            origin: "storefront".into(),
            shipping_address: None,
            shipping_city: None,
            shipping_postal_code: None,
            contact_email: None,
            contact_phone: None,
        }
    }

    #[tokio::test]
    async fn enforces_party_email_uniqueness_per_tenant() {
        let store = MemoryStore::new();
        let party = PartyCreate {
            name: "Ada".into(),
            email: "a@x.com".into(),
            phone: None,
            address: None,
            origin: "storefront".into(),
        };
        store.insert_party("t1", party.clone()).await.unwrap();
        assert!(matches!(
            store.insert_party("t1", party.clone()).await,
            Err(StoreError::Duplicate(_))
        ));
        store.insert_party("t2", party).await.unwrap();
        assert_eq!(store.parties().len(), 2);
    }

    #[tokio::test]
    async fn enforces_order_number_and_external_id_uniqueness() {
        let store = MemoryStore::new();
        store
            .insert_order("t1", header("SO20260314001", Some("EXT-1")))
            .await
            .unwrap();
        assert!(matches!(
            store.insert_order("t1", header("SO20260314001", None)).await,
            Err(StoreError::Duplicate(_))
        ));
        assert!(matches!(
            store
                .insert_order("t1", header("SO20260314002", Some("EXT-1")))
                .await,
            Err(StoreError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn latest_order_number_ranks_long_suffixes_higher() {
        let store = MemoryStore::new();
        for number in ["SO20260314999", "SO202603141000", "SO20260313005"] {
            store.insert_order("t1", header(number, None)).await.unwrap();
        }
        let latest = store
            .latest_order_number("t1", "SO20260314")
            .await
            .unwrap();
        assert_eq!(latest.as_deref(), Some("SO202603141000"));
        assert_eq!(store.latest_order_number("t2", "SO20260314").await.unwrap(), None);
    }

    fn sale(reference: &str) -> LedgerEntryCreate {
        LedgerEntryCreate {
            kind: LedgerEntryKind::Income,
            amount: Decimal::from(10),
            category: "sales".into(),
            reference: reference.into(),
            entry_date: 0,
        }
    }

    #[tokio::test]
    async fn record_delivery_is_all_or_nothing_and_booked_once() {
        let store = MemoryStore::new();
        let item = store
            .insert_item(
                "t1",
                CatalogItemCreate {
                    name: "Gear".into(),
                    sku: "GEAR".into(),
                    unit_cost: Decimal::from(7),
                    unit_price: Decimal::from(10),
                    quantity: 100,
                    is_active: true,
                    is_storefront_item: true,
                },
            )
            .await
            .unwrap();

        let unknown = [
            StockAdjustment { item_id: item.id, delta: -3 },
            StockAdjustment { item_id: item.id + 1, delta: -1 },
        ];
        assert!(matches!(
            store.record_delivery("t1", &unknown, sale("SO1")).await,
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.items()[0].quantity, 100);
        assert!(store.ledger().is_empty());

        let adjustments = [StockAdjustment { item_id: item.id, delta: -3 }];
        let booked = store.record_delivery("t1", &adjustments, sale("SO1")).await.unwrap();
        assert!(booked.is_some());
        let again = store.record_delivery("t1", &adjustments, sale("SO1")).await.unwrap();
        assert!(again.is_none());

        assert_eq!(store.items()[0].quantity, 97);
        assert_eq!(store.ledger().len(), 1);
    }

    #[tokio::test]
    async fn fail_points_trip_until_cleared() {
        let store = MemoryStore::new();
        store.fail_on(FailPoint::FindParty);
        assert!(matches!(
            store.find_party_by_email("t1", "a@x.com").await,
            Err(StoreError::Unavailable(_))
        ));
        store.clear_failures();
        assert!(store.find_party_by_email("t1", "a@x.com").await.unwrap().is_none());
    }
}

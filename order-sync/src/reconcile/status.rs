//! Status updates and the fulfilment side effect
//!
//! Reaching `delivered` books one income ledger entry referenced by the order
//! number and decrements stock for every line, as a single store write. It
//! runs before the status itself is saved, so a failed side effect leaves the
//! order in its previous status and "Deliver" can simply be retried. An order
//! whose sales entry is already booked is not decremented again.

use shared::models::{
    LedgerEntryCreate, LedgerEntryKind, OrderHeader, OrderStatus, SALES_LEDGER_CATEGORY,
};
use shared::util::now_millis;

use crate::db::{RecordStore, StockAdjustment};
use crate::error::{SyncError, SyncResult};

/// Map `external` to a canonical status and apply it to the order
pub async fn update_status(
    store: &dyn RecordStore,
    tenant_id: &str,
    order_id: i64,
    external: &str,
    reason: Option<&str>,
) -> SyncResult<OrderStatus> {
    if external.trim().is_empty() {
        return Err(SyncError::Validation("status must not be blank".into()));
    }

    let header = store
        .find_order(tenant_id, order_id)
        .await?
        .ok_or(SyncError::OrderNotFound(order_id))?;

    let previous = header.status();
    let status = OrderStatus::from_external(external);
    if previous.is_terminal() && previous != status {
        tracing::warn!(order_id, from = %previous, to = %status, "Status change after terminal state");
    }

    if status == OrderStatus::Delivered && previous != OrderStatus::Delivered {
        apply_delivery(store, tenant_id, &header).await?;
    }

    store
        .update_order_status(tenant_id, order_id, &status)
        .await
        .map_err(|e| {
            tracing::error!(order_id, status = %status, error = %e, "Status update rejected");
            SyncError::StatusUpdate(e)
        })?;

    if let Err(e) = store
        .append_status_history(tenant_id, order_id, &status, reason)
        .await
    {
        tracing::warn!(order_id, error = %e, "Failed to record status history");
    }

    tracing::info!(order_id, from = %previous, to = %status, "Order status updated");
    Ok(status)
}

async fn apply_delivery(store: &dyn RecordStore, tenant_id: &str, header: &OrderHeader) -> SyncResult<()> {
    let adjustments: Vec<StockAdjustment> = store
        .find_lines(tenant_id, &[header.id])
        .await?
        .iter()
        .map(|line| StockAdjustment {
            item_id: line.item_id,
            delta: -i64::from(line.quantity),
        })
        .collect();

    let entry = LedgerEntryCreate {
        kind: LedgerEntryKind::Income,
        amount: header.total_amount,
        category: SALES_LEDGER_CATEGORY.to_string(),
        reference: header.order_number.clone(),
        entry_date: now_millis(),
    };

    match store.record_delivery(tenant_id, &adjustments, entry).await? {
        Some(booked) => tracing::info!(
            order_id = header.id,
            order_number = %header.order_number,
            amount = %booked.amount,
            lines = adjustments.len(),
            "Booked sales income for delivered order"
        ),
        None => tracing::debug!(
            order_number = %header.order_number,
            "Sales entry already booked, stock left as is"
        ),
    }
    Ok(())
}

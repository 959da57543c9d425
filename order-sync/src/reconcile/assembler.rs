//! Order header + lines persistence, and order deletion
//!
//! Header and lines are written as one logical unit without a store
//! transaction: when the line insert fails the header is deleted again
//! (best-effort). A crash between the two writes leaves an orphaned header,
//! which is an accepted failure mode.

use rust_decimal::Decimal;
use shared::models::{OrderHeader, OrderHeaderCreate, OrderLineCreate, OrderStatus, SALES_LEDGER_CATEGORY};
use shared::storefront::StorefrontOrderPayload;
use shared::util::non_blank;

use super::SyncSettings;
use super::catalog::ResolvedCatalog;
use crate::db::RecordStore;
use crate::error::{SyncError, SyncResult};

pub const INITIAL_STATUS_REASON: &str = "initial order placement from storefront";

/// Match every payload line to its resolved catalog item
fn build_lines(
    payload: &StorefrontOrderPayload,
    catalog: &ResolvedCatalog,
) -> SyncResult<Vec<OrderLineCreate>> {
    payload
        .items
        .iter()
        .map(|line| {
            let key = line.effective_sku();
            let item_id = catalog.item_for(key).ok_or_else(|| SyncError::UnmatchedLine {
                key: key.to_string(),
            })?;
            let gross = line.unit_price * Decimal::from(line.quantity);
            Ok(OrderLineCreate {
                item_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.total_price,
                discount: (gross - line.total_price).max(Decimal::ZERO),
            })
        })
        .collect()
}

/// Persist header, lines and the initial history entry for a reconciled order
pub async fn assemble(
    store: &dyn RecordStore,
    settings: &SyncSettings,
    order_number: &str,
    party_id: i64,
    payload: &StorefrontOrderPayload,
    catalog: &ResolvedCatalog,
) -> SyncResult<OrderHeader> {
    let tenant_id = settings.tenant_id.as_str();
    let lines = build_lines(payload, catalog)?;
    let customer = &payload.customer_info;
    let status = OrderStatus::Pending;

    let header = store
        .insert_order(
            tenant_id,
            OrderHeaderCreate {
                order_number: order_number.to_string(),
                party_id: Some(party_id),
                external_order_id: Some(payload.order_id.trim().to_string()),
                order_date: payload.order_date,
                total_amount: payload.total_amount,
                status: status.clone(),
                payment_method: payload.payment_method.clone(),
                notes: non_blank(payload.notes.as_deref()).map(str::to_string),
                origin: settings.origin.clone(),
                shipping_address: non_blank(Some(customer.address.as_str())).map(str::to_string),
                shipping_city: non_blank(Some(customer.city.as_str())).map(str::to_string),
                shipping_postal_code: non_blank(Some(customer.postal_code.as_str()))
                    .map(str::to_string),
                contact_email: non_blank(Some(customer.email.as_str())).map(str::to_string),
                contact_phone: non_blank(Some(customer.phone.as_str())).map(str::to_string),
            },
        )
        .await
        .map_err(|e| {
            tracing::error!(order_number = %order_number, error = %e, "Failed to create order header");
            SyncError::Header(e)
        })?;

    if let Err(e) = store.insert_lines(tenant_id, header.id, &lines).await {
        tracing::error!(
            order_id = header.id,
            order_number = %header.order_number,
            error = %e,
            "Failed to create order lines, removing header"
        );
        if let Err(delete_err) = store.delete_order(tenant_id, header.id).await {
            tracing::error!(
                order_id = header.id,
                error = %delete_err,
                "Compensating header delete failed, order left orphaned"
            );
        }
        return Err(SyncError::Lines(e));
    }

    if let Err(e) = store
        .append_status_history(tenant_id, header.id, &status, Some(INITIAL_STATUS_REASON))
        .await
    {
        tracing::warn!(order_id = header.id, error = %e, "Failed to record initial status history");
    }

    tracing::info!(
        order_id = header.id,
        order_number = %header.order_number,
        lines = lines.len(),
        "Order assembled"
    );
    Ok(header)
}

/// Delete an order: lines, then its sales ledger entries, then the header.
///
/// A failure deleting lines aborts before anything else is touched. Status
/// history goes with the header.
pub async fn delete(store: &dyn RecordStore, tenant_id: &str, order_id: i64) -> SyncResult<()> {
    let header = store
        .find_order(tenant_id, order_id)
        .await?
        .ok_or(SyncError::OrderNotFound(order_id))?;

    let lines = store.delete_lines(tenant_id, order_id).await.map_err(|e| {
        tracing::error!(order_id, error = %e, "Failed to delete order lines, order kept");
        SyncError::Store(e)
    })?;

    let ledger = store
        .delete_ledger_entries(tenant_id, SALES_LEDGER_CATEGORY, &header.order_number)
        .await?;

    if !store.delete_order(tenant_id, order_id).await? {
        return Err(SyncError::OrderNotFound(order_id));
    }

    tracing::info!(
        order_id,
        order_number = %header.order_number,
        lines,
        ledger_entries = ledger,
        "Order deleted"
    );
    Ok(())
}

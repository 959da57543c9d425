//! Customer find-or-create, keyed by (tenant, email)

use shared::models::PartyCreate;
use shared::storefront::CustomerInfo;
use shared::util::non_blank;

use crate::db::RecordStore;
use crate::error::{SyncError, SyncResult};

/// Return the id of the party owning `customer.email`, creating it when absent.
///
/// An existing party is returned untouched: the first-seen name and address
/// win. A failed insert (including losing a concurrent race on the email)
/// is a hard error.
pub async fn resolve(
    store: &dyn RecordStore,
    tenant_id: &str,
    origin: &str,
    customer: &CustomerInfo,
) -> SyncResult<i64> {
    let email = customer.email.trim();

    if let Some(existing) = store
        .find_party_by_email(tenant_id, email)
        .await
        .map_err(SyncError::Party)?
    {
        tracing::debug!(party_id = existing.id, "Reusing existing party");
        return Ok(existing.id);
    }

    let party = store
        .insert_party(
            tenant_id,
            PartyCreate {
                name: display_name(customer),
                email: email.to_string(),
                phone: non_blank(Some(customer.phone.as_str())).map(str::to_string),
                address: compose_address(customer),
                origin: origin.to_string(),
            },
        )
        .await
        .map_err(|e| {
            tracing::error!(email = %email, error = %e, "Failed to create party");
            SyncError::Party(e)
        })?;

    tracing::info!(party_id = party.id, "Created party from storefront order");
    Ok(party.id)
}

fn display_name(customer: &CustomerInfo) -> String {
    format!("{} {}", customer.first_name.trim(), customer.last_name.trim())
        .trim()
        .to_string()
}

/// Single-line address from the non-blank parts, comma separated
fn compose_address(customer: &CustomerInfo) -> Option<String> {
    let parts: Vec<&str> = [
        &customer.address,
        &customer.city,
        &customer.state,
        &customer.postal_code,
        &customer.country,
    ]
    .into_iter()
    .filter_map(|part| non_blank(Some(part.as_str())))
    .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

//! Order number allocation
//!
//! Numbers look like `<PREFIX><YYYYMMDD><NNN>`, e.g. `SO20260314007`. The
//! suffix is zero-padded to at least three digits and keeps growing past 999.
//! Allocation never fails: a failed lookup or an unparseable latest number
//! restarts the day at `001`. The store's unique constraint on
//! (tenant, order number) catches the collision that may follow.

use chrono::NaiveDate;

use crate::db::RecordStore;

/// Day prefix for a date: `<PREFIX><YYYYMMDD>`
pub fn day_prefix(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}{}", date.format("%Y%m%d"))
}

/// Next order number for `date`
pub async fn allocate(store: &dyn RecordStore, tenant_id: &str, prefix: &str, date: NaiveDate) -> String {
    let day = day_prefix(prefix, date);

    let next = match store.latest_order_number(tenant_id, &day).await {
        Ok(None) => 1,
        Ok(Some(latest)) => match parse_suffix(&latest, &day).and_then(|n| n.checked_add(1)) {
            Some(next) => next,
            None => {
                tracing::warn!(latest = %latest, "Unparseable order number suffix, restarting at 001");
                1
            }
        },
        Err(e) => {
            tracing::warn!(day = %day, error = %e, "Order number lookup failed, restarting at 001");
            1
        }
    };

    format!("{day}{next:03}")
}

fn parse_suffix(number: &str, day: &str) -> Option<u64> {
    let suffix = number.strip_prefix(day)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

//! Catalog item find-or-create, keyed by (tenant, SKU)

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::models::CatalogItemCreate;
use shared::storefront::StorefrontLineItem;
use shared::util::round_money;

use super::SyncSettings;
use crate::db::RecordStore;
use crate::error::{SyncError, SyncResult};

/// Effective SKU → catalog item id for one order
#[derive(Debug, Default, Clone)]
pub struct ResolvedCatalog {
    by_sku: HashMap<String, i64>,
}

impl ResolvedCatalog {
    pub fn item_for(&self, sku: &str) -> Option<i64> {
        self.by_sku.get(sku).copied()
    }

    pub fn len(&self) -> usize {
        self.by_sku.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sku.is_empty()
    }
}

/// Unit cost inferred from the selling price
pub fn inferred_cost(unit_price: Decimal, cost_ratio: Decimal) -> Decimal {
    round_money(unit_price * cost_ratio)
}

/// Resolve every line to a catalog item.
///
/// Existing items are reused as-is (price and cost are not refreshed). Items
/// created by earlier lines stay in place when a later insert fails.
pub async fn resolve(
    store: &dyn RecordStore,
    settings: &SyncSettings,
    lines: &[StorefrontLineItem],
) -> SyncResult<ResolvedCatalog> {
    let mut resolved = ResolvedCatalog::default();

    for line in lines {
        let sku = line.effective_sku();
        if resolved.by_sku.contains_key(sku) {
            continue;
        }

        let existing = store
            .find_item_by_sku(&settings.tenant_id, sku)
            .await
            .map_err(|source| SyncError::Catalog {
                sku: sku.to_string(),
                source,
            })?;

        let item_id = match existing {
            Some(item) => item.id,
            None => {
                let name = match line.product_name.trim() {
                    "" => sku.to_string(),
                    name => name.to_string(),
                };
                let item = store
                    .insert_item(
                        &settings.tenant_id,
                        CatalogItemCreate {
                            name,
                            sku: sku.to_string(),
                            unit_cost: inferred_cost(line.unit_price, settings.cost_ratio),
                            unit_price: line.unit_price,
                            quantity: settings.default_stock,
                            is_active: true,
                            is_storefront_item: true,
                        },
                    )
                    .await
                    .map_err(|source| {
                        tracing::error!(sku = %sku, error = %source, "Failed to create catalog item");
                        SyncError::Catalog {
                            sku: sku.to_string(),
                            source,
                        }
                    })?;
                tracing::info!(item_id = item.id, sku = %sku, "Created storefront catalog item");
                item.id
            }
        };

        resolved.by_sku.insert(sku.to_string(), item_id);
    }

    Ok(resolved)
}

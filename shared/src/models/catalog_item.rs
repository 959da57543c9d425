//! Catalog Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inventory entry, unique per (tenant, sku)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CatalogItem {
    pub id: i64,
    pub tenant_id: String,
    pub name: String,
    pub sku: String,
    pub unit_cost: Decimal,
    pub unit_price: Decimal,
    /// On-hand quantity
    pub quantity: i64,
    pub is_active: bool,
    /// Created by the storefront sync rather than by a back-office screen
    pub is_storefront_item: bool,
    pub created_at: i64,
}

/// Create catalog item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItemCreate {
    pub name: String,
    pub sku: String,
    pub unit_cost: Decimal,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub is_active: bool,
    pub is_storefront_item: bool,
}

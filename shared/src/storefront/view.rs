//! Unified storefront order shape consumed by listings
//!
//! Produced either from the denormalized store view or from a manual join of
//! the raw tables. Nested fields default to empty values so consumers never
//! have to null-check.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CatalogItem, OrderHeader, OrderLine, Party};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontOrder {
    pub id: i64,
    pub order_number: String,
    #[serde(default)]
    pub external_order_id: String,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub total_amount: Decimal,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub customer: StorefrontCustomer,
    #[serde(default)]
    pub shipping: StorefrontShipping,
    #[serde(default)]
    pub items: Vec<StorefrontOrderItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorefrontCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorefrontShipping {
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorefrontOrderItem {
    pub product_name: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl StorefrontOrder {
    /// Reshape raw records into the listing shape.
    ///
    /// Customer email and phone fall back to the order's contact snapshot when
    /// the party is missing or has none; everything else absent becomes empty.
    pub fn from_records(
        header: &OrderHeader,
        party: Option<&Party>,
        lines: &[(&OrderLine, Option<&CatalogItem>)],
    ) -> Self {
        let customer = StorefrontCustomer {
            name: party.map(|p| p.name.clone()).unwrap_or_default(),
            email: party
                .map(|p| p.email.as_str())
                .filter(|e| !e.is_empty())
                .or(header.contact_email.as_deref())
                .unwrap_or_default()
                .to_string(),
            phone: party
                .and_then(|p| p.phone.as_deref())
                .or(header.contact_phone.as_deref())
                .unwrap_or_default()
                .to_string(),
        };
        let items = lines
            .iter()
            .map(|(line, item)| StorefrontOrderItem {
                product_name: item.map(|i| i.name.clone()).unwrap_or_default(),
                sku: item.map(|i| i.sku.clone()).unwrap_or_default(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.total_price,
            })
            .collect();

        Self {
            id: header.id,
            order_number: header.order_number.clone(),
            external_order_id: header.external_order_id.clone().unwrap_or_default(),
            order_date: header.order_date,
            status: header.status.clone(),
            total_amount: header.total_amount,
            payment_method: header.payment_method.clone(),
            notes: header.notes.clone().unwrap_or_default(),
            customer,
            shipping: StorefrontShipping {
                address: header.shipping_address.clone().unwrap_or_default(),
                city: header.shipping_city.clone().unwrap_or_default(),
                postal_code: header.shipping_postal_code.clone().unwrap_or_default(),
            },
            items,
        }
    }
}

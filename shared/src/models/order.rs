//! Order Model
//!
//! Header, lines and the append-only status history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::OrderStatus;

/// Order header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderHeader {
    pub id: i64,
    pub tenant_id: String,
    /// `<PREFIX><YYYYMMDD><NNN>`, unique per tenant
    pub order_number: String,
    /// None for walk-in / anonymous orders
    pub party_id: Option<i64>,
    /// Identifier assigned by the storefront
    pub external_order_id: Option<String>,
    pub order_date: DateTime<Utc>,
    /// Declared total
    pub total_amount: Decimal,
    /// Canonical status string (see [`OrderStatus`])
    pub status: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub origin: String,
    pub shipping_address: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_postal_code: Option<String>,
    /// Contact snapshot at time of order
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: i64,
}

impl OrderHeader {
    pub fn status(&self) -> OrderStatus {
        OrderStatus::parse(&self.status)
    }
}

/// Create order header payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHeaderCreate {
    pub order_number: String,
    pub party_id: Option<i64>,
    pub external_order_id: Option<String>,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: String,
    pub notes: Option<String>,
    pub origin: String,
    pub shipping_address: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub item_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub discount: Decimal,
}

/// Create order line payload (order id supplied by the bulk insert)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineCreate {
    pub item_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub discount: Decimal,
}

/// Status history entry (append-only audit trail)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusHistoryEntry {
    pub id: i64,
    pub order_id: i64,
    pub status: String,
    pub reason: Option<String>,
    pub created_at: i64,
}

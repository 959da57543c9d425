//! Party (customer) Model

use serde::{Deserialize, Serialize};

/// Customer record, unique per (tenant, email)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Party {
    pub id: i64,
    pub tenant_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Single-line composed address
    pub address: Option<String>,
    /// Provenance tag, e.g. "storefront"
    pub origin: String,
    pub created_at: i64,
}

/// Create party payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub origin: String,
}

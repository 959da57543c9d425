//! Canonical order status vocabulary
//!
//! `pending → confirmed → shipped → delivered`, with `cancelled` reachable from
//! any non-terminal state. Back-office screens and the storefront speak their
//! own phrases ("Order Confirmed", "Ship", ...); [`OrderStatus::from_external`]
//! translates them. Unknown phrases are kept as lower-cased [`OrderStatus::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    /// Unrecognized external value, stored lower-cased
    Other(String),
}

/// External phrase → canonical status
const EXTERNAL_VOCABULARY: &[(&str, OrderStatus)] = &[
    ("Order Placed", OrderStatus::Pending),
    ("Order Pending", OrderStatus::Pending),
    ("Confirm", OrderStatus::Confirmed),
    ("Order Confirmed", OrderStatus::Confirmed),
    ("Ship", OrderStatus::Shipped),
    ("Order Shipped", OrderStatus::Shipped),
    ("Order Pending Delivery", OrderStatus::Shipped),
    ("Deliver", OrderStatus::Delivered),
    ("Order Delivered", OrderStatus::Delivered),
    ("Cancel", OrderStatus::Cancelled),
    ("Order Cancelled", OrderStatus::Cancelled),
    ("Order Canceled", OrderStatus::Cancelled),
];

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s,
        }
    }

    /// Parse a stored (canonical) status string
    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "shipped" => Self::Shipped,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }

    /// Translate an external/UI phrase. Never rejects: anything outside the
    /// table is lower-cased and passed through.
    pub fn from_external(value: &str) -> Self {
        let value = value.trim();
        EXTERNAL_VOCABULARY
            .iter()
            .find(|(phrase, _)| *phrase == value)
            .map(|(_, status)| status.clone())
            .unwrap_or_else(|| Self::parse(&value.to_lowercase()))
    }

    /// `delivered` and `cancelled` end the lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

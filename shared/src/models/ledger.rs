//! Financial Ledger Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger category used for storefront sales income
pub const SALES_LEDGER_CATEGORY: &str = "sales";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    Income,
    Expense,
}

impl LedgerEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// Ledger entry, referenced by order number
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub id: i64,
    pub tenant_id: String,
    /// "income" | "expense"
    pub kind: String,
    pub amount: Decimal,
    pub category: String,
    pub reference: String,
    pub entry_date: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryCreate {
    pub kind: LedgerEntryKind,
    pub amount: Decimal,
    pub category: String,
    pub reference: String,
    pub entry_date: i64,
}

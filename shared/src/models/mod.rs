//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All record IDs are snowflake `i64`, audit timestamps are Unix millis,
//! money is `Decimal`. Every row carries the owning `tenant_id`.

pub mod catalog_item;
pub mod ledger;
pub mod order;
pub mod party;
pub mod status;

// Re-exports
pub use catalog_item::*;
pub use ledger::*;
pub use order::*;
pub use party::*;
pub use status::OrderStatus;

//! Shared types for the storefront order sync
//!
//! Domain models, the storefront wire types, the canonical order status
//! vocabulary and the unified error codes used by the service crate.

pub mod error;
pub mod models;
pub mod storefront;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use models::OrderStatus;
pub use storefront::{ReconcileOutcome, StorefrontOrder, StorefrontOrderPayload};

//! Storefront wire types
//!
//! - [`StorefrontOrderPayload`]: inbound "new external order" body
//! - [`ReconcileOutcome`]: the single success/failure result per order
//! - [`StorefrontOrder`]: the unified order shape returned by listings

mod payload;
mod view;

pub use payload::*;
pub use view::*;

//! order-sync: storefront order reconciliation service
//!
//! Ingests orders placed on an external storefront and reconciles them into
//! internal records (customers, catalog items, order header and lines, status
//! history), then drives their lifecycle (status updates with the delivery
//! side effect, deletion) and exposes a unified order listing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod reconcile;
pub mod signature;
pub mod state;

pub use config::Config;
pub use error::{SyncError, SyncResult};
pub use reconcile::{ReconcileReport, ReconcileService, ReconciledOrder, SyncSettings};
pub use state::AppState;

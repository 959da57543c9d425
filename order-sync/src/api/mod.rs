//! API routes for order-sync

pub mod health;
pub mod orders;
pub mod storefront;

use crate::state::AppState;
use axum::Router;
use axum::routing::{get, put};
use tower_http::trace::TraceLayer;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Storefront intake (signature-verified, raw body) and listing
    let storefront = Router::new().route(
        "/api/storefront/orders",
        get(storefront::list_orders).post(storefront::reconcile_order),
    );

    // Back-office lifecycle
    let orders = Router::new()
        .route("/api/orders/{id}", axum::routing::delete(orders::delete_order))
        .route("/api/orders/{id}/status", put(orders::update_status))
        .route("/api/orders/{id}/history", get(orders::status_history));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(storefront)
        .merge(orders)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

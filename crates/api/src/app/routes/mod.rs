use axum::{Router, routing::get};

pub mod functions;
pub mod inventory;
pub mod smart_orders;
pub mod system;

/// Router for all authenticated (tenant-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/inventory", inventory::router())
        .nest("/smart-orders", smart_orders::router())
        .nest("/functions", functions::router())
}

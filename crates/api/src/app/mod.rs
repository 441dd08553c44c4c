//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: integration clients and stores shared by handlers
//! - `store.rs`: tenant-isolated in-memory storage
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod store;

pub use services::AppServices;

/// Build the full HTTP router from configuration (used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let services = AppServices::from_config(config)?;
    Ok(build_app_with(&config.jwt_secret, services))
}

/// Build the router around already-constructed services.
pub fn build_app_with(jwt_secret: &str, services: AppServices) -> Router {
    let jwt = Arc::new(larder_auth::Hs256JwtValidator::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: auth runs first, then services are attached.
    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(Extension(Arc::new(services))),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .fallback(|| async { errors::not_found("route not found") })
}

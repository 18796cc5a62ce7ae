//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: catalog backend, cached listings, email settings
//! - `routes/`: handlers, one file per area of the site
//! - `errors.rs`: HTML error pages

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around already wired services.
pub fn build_app(services: services::AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(Extension(Arc::new(services))),
        )
}

/// Wire services from `config` and build the router (entrypoint used by `main.rs`).
pub async fn build_app_from_config(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(build_app(services))
}

use axum::{routing::get, Router};

pub mod emails;
pub mod products;
pub mod storefront;
pub mod system;

/// Router for every page of the storefront.
pub fn router() -> Router {
    Router::new()
        .route("/", get(storefront::home))
        .nest("/products", products::router())
        .nest("/emails", emails::router())
}

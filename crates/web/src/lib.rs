//! Customer-facing storefront: HTTP server, page rendering, routing.

pub mod app;
pub mod config;
pub mod middleware;
pub mod views;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use storefront_infra::catalog::CatalogError;

use crate::views::{layout, pages};

pub fn catalog_error_to_response(err: CatalogError) -> Response {
    tracing::error!(error = %err, "catalog request failed");
    match err {
        CatalogError::Unavailable(_) => html_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service unavailable",
            "The store is temporarily unavailable. Please try again shortly.",
        ),
        CatalogError::Query(_) | CatalogError::Decode(_) => html_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong",
            "We could not complete your request.",
        ),
    }
}

pub fn html_error(status: StatusCode, title: &str, detail: &str) -> Response {
    (status, Html(layout::page(title, pages::message(title, detail)))).into_response()
}

//! Streamed listing pages.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::Extension,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use tokio_stream::StreamExt;

use crate::app::services::AppServices;
use crate::views::deferred::{self, GridSection};
use crate::views::pages;

pub async fn home(Extension(services): Extension<Arc<AppServices>>) -> Response {
    stream_page("Storefront", pages::home_sections(&services.listings))
}

pub async fn products(Extension(services): Extension<Arc<AppServices>>) -> Response {
    stream_page("Products", pages::products_sections(&services.listings))
}

fn stream_page(title: &str, sections: Vec<GridSection>) -> Response {
    let chunks = deferred::render(title, sections).map(Ok::<_, Infallible>);
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
        Body::from_stream(chunks),
    )
        .into_response()
}

//! Product pages and time-limited downloads.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use chrono::Utc;

use storefront_core::DownloadVerificationId;
use storefront_products::Product;

use crate::app::errors;
use crate::app::routes::storefront;
use crate::app::services::AppServices;
use crate::views::{layout, pages};

pub const DOWNLOAD_EXPIRED_PATH: &str = "/products/download/expired";

pub fn router() -> Router {
    Router::new()
        .route("/", get(storefront::products))
        .route("/download/expired", get(download_expired))
        .route("/download/:id", get(download))
}

pub async fn download_expired() -> Html<String> {
    Html(layout::page("Download expired", pages::download_expired()))
}

/// Serve a product file for a download verification that has not expired.
/// Unknown, malformed and expired ids all redirect to the expired page.
#[tracing::instrument(skip(services), fields(product_id = tracing::field::Empty))]
pub async fn download(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<DownloadVerificationId>() else {
        return Redirect::to(DOWNLOAD_EXPIRED_PATH).into_response();
    };

    let verification = match services.catalog.find_verification(id).await {
        Ok(Some(v)) if v.is_valid_at(Utc::now()) => v,
        Ok(_) => return Redirect::to(DOWNLOAD_EXPIRED_PATH).into_response(),
        Err(e) => return errors::catalog_error_to_response(e),
    };
    tracing::Span::current().record("product_id", tracing::field::display(verification.product_id));

    let product = match services.catalog.get_product(verification.product_id).await {
        Ok(Some(p)) => p,
        Ok(None) => return not_found(),
        Err(e) => return errors::catalog_error_to_response(e),
    };

    let path = services.product_files_dir.join(&product.file_path);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "product file unreadable");
            return not_found();
        }
    };

    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&product)),
        ],
        bytes,
    )
        .into_response()
}

fn not_found() -> Response {
    errors::html_error(
        StatusCode::NOT_FOUND,
        "File not found",
        "The file for this product is not available.",
    )
}

/// `attachment` header named after the product, keeping the file's extension.
fn content_disposition(product: &Product) -> String {
    let stem = header_safe(&product.name);
    let extension = std::path::Path::new(&product.file_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", header_safe(e)))
        .unwrap_or_default();

    format!("attachment; filename=\"{}{}\"", stem.trim(), extension)
}

/// Keep characters that are safe inside a quoted header parameter.
fn header_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{Cents, ProductId};
    use storefront_products::NewProduct;

    fn product(name: &str, file_path: &str) -> Product {
        Product::create(
            ProductId::new(),
            NewProduct {
                name: name.to_string(),
                description: "d".to_string(),
                image_path: "/i.png".to_string(),
                file_path: file_path.to_string(),
                price: Cents::new(100),
                is_available_for_purchase: true,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn disposition_uses_product_name_and_file_extension() {
        assert_eq!(
            content_disposition(&product("Rust Book", "files/rust.pdf")),
            r#"attachment; filename="Rust Book.pdf""#
        );
    }

    #[test]
    fn disposition_sanitizes_the_extension_too() {
        let disposition = content_disposition(&product("Book", "files/book.p\"d\nf"));

        assert_eq!(disposition, r#"attachment; filename="Book.p_d_f""#);
        assert!(axum::http::HeaderValue::from_str(&disposition).is_ok());
    }

    #[test]
    fn disposition_replaces_unsafe_characters() {
        assert_eq!(
            content_disposition(&product("a\"b/c\u{e9}", "files/noext")),
            r#"attachment; filename="a_b_c_""#
        );
    }
}

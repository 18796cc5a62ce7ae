use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use storefront_email::PurchaseReceiptEmail;

use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/purchase-receipt/preview", get(purchase_receipt_preview))
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    /// `text` for the plain-text alternative, `json` for the envelope and
    /// props a mail transport needs; HTML otherwise.
    pub format: Option<String>,
}

/// Render the purchase receipt with sample data.
pub async fn purchase_receipt_preview(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let email = PurchaseReceiptEmail::preview();
    let document = email.render(&services.email);

    match query.format.as_deref() {
        Some("text") => document.plain_text().into_response(),
        Some("json") => Json(serde_json::json!({
            "subject": email.subject(),
            "preview": document.preview,
            "props": email,
            "html": document.to_html(),
            "text": document.plain_text(),
        }))
        .into_response(),
        _ => Html(document.to_html()).into_response(),
    }
}

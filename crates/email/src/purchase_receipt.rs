use chrono::Utc;
use serde::{Deserialize, Serialize};

use storefront_core::{Cents, DownloadVerificationId, OrderId};
use storefront_markup::{Element, Node};

use crate::document::Document;
use crate::order_information::{OrderInformation, ReceiptOrder, ReceiptProduct};
use crate::settings::EmailSettings;

/// Receipt sent after a successful purchase, linking to the download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceiptEmail {
    pub product: ReceiptProduct,
    pub order: ReceiptOrder,
    pub download_verification_id: String,
}

impl PurchaseReceiptEmail {
    pub fn new(
        product: ReceiptProduct,
        order: ReceiptOrder,
        download_verification_id: impl Into<String>,
    ) -> Self {
        Self {
            product,
            order,
            download_verification_id: download_verification_id.into(),
        }
    }

    /// Sample data for previewing the template.
    pub fn preview() -> Self {
        Self::new(
            ReceiptProduct {
                name: "Product name".to_string(),
                description: "Some description".to_string(),
                image_path: "/products/sample.png".to_string(),
            },
            ReceiptOrder {
                id: OrderId::new(),
                created_at: Utc::now(),
                price_paid: Cents::new(10000),
            },
            DownloadVerificationId::new().to_string(),
        )
    }

    pub fn subject(&self) -> String {
        "Order Confirmation".to_string()
    }

    pub fn preview_text(&self) -> String {
        format!("Download {} and view receipt", self.product.name)
    }

    pub fn render(&self, settings: &EmailSettings) -> Document {
        let info = OrderInformation {
            product: &self.product,
            order: &self.order,
            download_verification_id: &self.download_verification_id,
        };

        let body: Node = Element::new("div")
            .style("max-width:36rem;margin:0 auto;padding:20px;")
            .child(
                Element::new("h1")
                    .style("font-size:24px;font-weight:700;")
                    .text("Purchase Receipt"),
            )
            .child(info.render(settings))
            .into();

        Document {
            preview: self.preview_text(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings() -> EmailSettings {
        EmailSettings::new("https://shop.example.com").unwrap()
    }

    fn receipt() -> PurchaseReceiptEmail {
        PurchaseReceiptEmail::new(
            ReceiptProduct {
                name: "Rust Patterns".to_string(),
                description: "A field guide".to_string(),
                image_path: "/products/rust.png".to_string(),
            },
            ReceiptOrder {
                id: OrderId::new(),
                created_at: Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
                price_paid: Cents::new(123_456),
            },
            "5f0c7e1a-0000-7000-8000-000000000001",
        )
    }

    #[test]
    fn rendering_is_deterministic() {
        let email = receipt();
        let first = email.render(&settings());
        let second = email.clone().render(&settings());

        assert_eq!(first, second);
        assert_eq!(first.to_html(), second.to_html());
    }

    #[test]
    fn html_contains_summary_and_download_link() {
        let email = receipt();
        let html = email.render(&settings()).to_html();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Purchase Receipt"));
        assert!(html.contains(&email.order.id.to_string()));
        assert!(html.contains("Oct 19, 2026"));
        assert!(html.contains("$1,234.56"));
        assert!(html.contains(r#"src="https://shop.example.com/products/rust.png""#));
        assert!(html.contains(
            r#"href="https://shop.example.com/products/download/5f0c7e1a-0000-7000-8000-000000000001""#
        ));
        assert!(html.contains("Download Rust Patterns and view receipt"));
    }

    #[test]
    fn product_fields_are_rendered_as_text_not_markup() {
        let mut email = receipt();
        email.product.name = "<img src=x onerror=alert(1)>".to_string();
        email.download_verification_id = "\"><script>".to_string();

        let html = email.render(&settings()).to_html();

        assert!(!html.contains("<img src=x"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn plain_text_lists_order_details_and_link() {
        let email = receipt();
        let text = email.render(&settings()).plain_text();

        assert!(text.starts_with("Purchase Receipt"));
        assert!(text.contains("Order ID"));
        assert!(text.contains("Price Paid\n$1,234.56"));
        assert!(text.contains(
            "Download Order (https://shop.example.com/products/download/5f0c7e1a-0000-7000-8000-000000000001)"
        ));
        assert!(!text.contains("view receipt"));
    }

    #[test]
    fn preview_fixture_renders() {
        let email = PurchaseReceiptEmail::preview();
        let doc = email.render(&settings());

        assert_eq!(doc.preview, "Download Product name and view receipt");
        assert_eq!(email.subject(), "Order Confirmation");
    }
}

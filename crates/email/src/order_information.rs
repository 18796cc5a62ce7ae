use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Cents, OrderId};
use storefront_markup::{Element, Node};
use storefront_products::Product;
use storefront_sales::Order;

use crate::format::{format_currency, format_date};
use crate::settings::EmailSettings;

const LABEL_STYLE: &str = "margin:0 0 4px;font-size:12px;color:#6b7280;white-space:nowrap;";
const VALUE_STYLE: &str = "margin:0;font-size:14px;white-space:nowrap;";
const CARD_STYLE: &str =
    "border:1px solid #9ca3af;border-radius:8px;padding:16px;margin:16px 0;";
const BUTTON_STYLE: &str = "display:inline-block;background-color:#000000;color:#ffffff;\
padding:12px 20px;border-radius:6px;font-size:16px;text-decoration:none;";

/// Product fields shown on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptProduct {
    pub name: String,
    pub description: String,
    pub image_path: String,
}

impl From<&Product> for ReceiptProduct {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            image_path: product.image_path.clone(),
        }
    }
}

/// Order fields shown on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptOrder {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub price_paid: Cents,
}

impl From<&Order> for ReceiptOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            created_at: order.created_at,
            price_paid: order.price_paid,
        }
    }
}

/// Order summary block: id, date, amount, the product and its download link.
#[derive(Debug, Clone, Copy)]
pub struct OrderInformation<'a> {
    pub product: &'a ReceiptProduct,
    pub order: &'a ReceiptOrder,
    pub download_verification_id: &'a str,
}

impl OrderInformation<'_> {
    /// The verification id is opaque, so it is percent-encoded as one path segment.
    pub fn download_url(&self, settings: &EmailSettings) -> String {
        settings.absolute(&format!(
            "/products/download/{}",
            urlencoding::encode(self.download_verification_id)
        ))
    }

    pub fn render(&self, settings: &EmailSettings) -> Node {
        let summary = Element::new("table")
            .attr("role", "presentation")
            .attr("width", "100%")
            .child(
                Element::new("tr")
                    .child(labelled("Order ID", self.order.id.to_string()))
                    .child(labelled("Purchased On", format_date(self.order.created_at)))
                    .child(labelled("Price Paid", format_currency(self.order.price_paid))),
            );

        let image = Element::new("img")
            .attr("src", settings.absolute(&self.product.image_path))
            .attr("alt", self.product.name.clone())
            .attr("width", "100%")
            .style("display:block;width:100%;border-radius:4px;");

        let title_row = Element::new("table")
            .attr("role", "presentation")
            .attr("width", "100%")
            .style("margin-top:16px;")
            .child(
                Element::new("tr")
                    .child(
                        Element::new("td").child(
                            Element::new("h2")
                                .style("margin:0;font-size:18px;font-weight:700;")
                                .text(self.product.name.clone()),
                        ),
                    )
                    .child(
                        Element::new("td").attr("align", "right").child(
                            Element::new("a")
                                .attr("href", self.download_url(settings))
                                .style(BUTTON_STYLE)
                                .text("Download Order"),
                        ),
                    ),
            );

        let description = Element::new("p")
            .style("margin:8px 0 0;color:#6b7280;")
            .text(self.product.description.clone());

        Node::fragment([
            Element::new("section").child(summary),
            Element::new("section")
                .style(CARD_STYLE)
                .child(image)
                .child(title_row)
                .child(description),
        ])
    }
}

fn labelled(label: &str, value: String) -> Element {
    Element::new("td")
        .style("padding-right:16px;vertical-align:top;")
        .child(Element::new("p").style(LABEL_STYLE).text(label))
        .child(Element::new("p").style(VALUE_STYLE).text(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ReceiptProduct {
        ReceiptProduct {
            name: "Rust Patterns".to_string(),
            description: "A field guide".to_string(),
            image_path: "/products/rust.png".to_string(),
        }
    }

    fn order() -> ReceiptOrder {
        ReceiptOrder {
            id: OrderId::new(),
            created_at: Utc::now(),
            price_paid: Cents::new(100),
        }
    }

    fn download_url(id: &str) -> String {
        let (product, order) = (product(), order());
        OrderInformation {
            product: &product,
            order: &order,
            download_verification_id: id,
        }
        .download_url(&EmailSettings::new("https://shop.example.com").unwrap())
    }

    #[test]
    fn uuid_ids_are_used_verbatim() {
        assert_eq!(
            download_url("0192a1b2-0000-7000-8000-000000000001"),
            "https://shop.example.com/products/download/0192a1b2-0000-7000-8000-000000000001"
        );
    }

    #[test]
    fn reserved_characters_stay_inside_the_id_segment() {
        assert_eq!(
            download_url("a/b?c#d"),
            "https://shop.example.com/products/download/a%2Fb%3Fc%23d"
        );
    }
}

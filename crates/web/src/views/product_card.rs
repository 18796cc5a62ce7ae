use storefront_markup::{Element, Node};
use storefront_products::Product;

/// Card linking to the product's purchase page.
pub fn product_card(product: &Product) -> Node {
    Element::new("div")
        .class("card")
        .child(
            Element::new("div").class("card-image").child(
                Element::new("img")
                    .attr("src", product.image_path.clone())
                    .attr("alt", product.name.clone()),
            ),
        )
        .child(
            Element::new("div")
                .class("card-body")
                .child(Element::new("h3").text(product.name.clone()))
                .child(Element::new("p").class("price").text(product.price.to_string()))
                .child(Element::new("p").class("description").text(product.description.clone())),
        )
        .child(
            Element::new("div").class("card-footer").child(
                Element::new("a")
                    .class("button")
                    .attr("href", format!("/products/{}/purchase", product.id))
                    .text("Purchase"),
            ),
        )
        .into()
}

/// Same footprint as [`product_card`], shown while products load.
pub fn product_card_skeleton() -> Node {
    let line = |width: &str| {
        Element::new("div")
            .class("line")
            .style(format!("width:{width}"))
    };

    Element::new("div")
        .class("card product-card-skeleton animate-pulse")
        .attr("aria-hidden", "true")
        .child(Element::new("div").class("card-image"))
        .child(
            Element::new("div")
                .class("card-body")
                .child(line("75%"))
                .child(line("25%"))
                .child(line("100%"))
                .child(line("100%"))
                .child(line("75%")),
        )
        .child(
            Element::new("div")
                .class("card-footer")
                .child(Element::new("div").class("button").text("\u{a0}")),
        )
        .into()
}

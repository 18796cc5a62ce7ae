//! Page compositions.

use std::sync::Arc;

use async_trait::async_trait;

use storefront_infra::catalog::CatalogResult;
use storefront_infra::listings::ProductListings;
use storefront_markup::{Element, Node};
use storefront_products::Product;

use crate::views::deferred::{GridSection, ProductSource};

/// Skeleton cards per home page section.
pub const HOME_PLACEHOLDERS: usize = 3;

/// Skeleton cards on the all-products page.
pub const PRODUCTS_PLACEHOLDERS: usize = 6;

pub struct MostPopular(pub Arc<ProductListings>);

#[async_trait]
impl ProductSource for MostPopular {
    async fn fetch(&self) -> CatalogResult<Vec<Product>> {
        self.0.most_popular().await
    }
}

pub struct Newest(pub Arc<ProductListings>);

#[async_trait]
impl ProductSource for Newest {
    async fn fetch(&self) -> CatalogResult<Vec<Product>> {
        self.0.newest().await
    }
}

pub struct AllAvailable(pub Arc<ProductListings>);

#[async_trait]
impl ProductSource for AllAvailable {
    async fn fetch(&self) -> CatalogResult<Vec<Product>> {
        self.0.all_available().await
    }
}

/// Home page: "Most Popular" above "Newest".
pub fn home_sections(listings: &Arc<ProductListings>) -> Vec<GridSection> {
    vec![
        GridSection {
            slot: "most-popular",
            title: Some("Most Popular".to_string()),
            view_all: true,
            placeholders: HOME_PLACEHOLDERS,
            source: Arc::new(MostPopular(listings.clone())),
        },
        GridSection {
            slot: "newest",
            title: Some("Newest".to_string()),
            view_all: true,
            placeholders: HOME_PLACEHOLDERS,
            source: Arc::new(Newest(listings.clone())),
        },
    ]
}

/// All available products, alphabetically, in one grid.
pub fn products_sections(listings: &Arc<ProductListings>) -> Vec<GridSection> {
    vec![GridSection {
        slot: "all-products",
        title: None,
        view_all: false,
        placeholders: PRODUCTS_PLACEHOLDERS,
        source: Arc::new(AllAvailable(listings.clone())),
    }]
}

/// Shown when a download link is unknown or past its expiry.
pub fn download_expired() -> Node {
    Element::new("section")
        .child(Element::new("h1").text("Download link expired"))
        .child(
            Element::new("p").text("This download link is no longer valid. Check your receipt email or contact support."),
        )
        .child(
            Element::new("a")
                .class("button")
                .attr("href", "/products")
                .text("Browse products"),
        )
        .into()
}

/// Generic message page body.
pub fn message(title: &str, detail: &str) -> Node {
    Element::new("section")
        .child(Element::new("h1").text(title.to_string()))
        .child(Element::new("p").text(detail.to_string()))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_infra::catalog::InMemoryCatalog;
    use storefront_infra::listings::ListingsConfig;

    fn listings() -> Arc<ProductListings> {
        Arc::new(ProductListings::new(
            Arc::new(InMemoryCatalog::new()),
            ListingsConfig::default(),
        ))
    }

    #[test]
    fn home_has_popular_then_newest() {
        let sections = home_sections(&listings());

        let titles: Vec<_> = sections.iter().map(|s| s.title.clone().unwrap()).collect();
        assert_eq!(titles, vec!["Most Popular", "Newest"]);
        assert!(sections.iter().all(|s| s.placeholders == 3 && s.view_all));
    }

    #[test]
    fn products_page_is_one_untitled_grid() {
        let sections = products_sections(&listings());

        assert_eq!(sections.len(), 1);
        assert!(sections[0].title.is_none());
        assert_eq!(sections[0].placeholders, 6);
    }

    #[tokio::test]
    async fn sources_read_from_listings() {
        let sections = home_sections(&listings());

        for section in sections {
            assert!(section.source.fetch().await.unwrap().is_empty());
        }
    }
}

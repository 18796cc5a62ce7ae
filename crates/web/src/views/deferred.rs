//! Deferred product sections.
//!
//! A page is streamed as one HTML response. The first chunk is the document
//! shell with every section showing skeleton cards. Each section's fetch runs
//! as its own task; when it finishes, a `<template>` holding the real cards is
//! streamed along with a script call that swaps it into the section's slot.
//! Sections resolve in whatever order their fetches complete, and a slow or
//! failing section never holds back the others.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};

use storefront_infra::catalog::CatalogResult;
use storefront_markup::{Element, Node};
use storefront_products::Product;

use crate::views::layout;
use crate::views::product_card::{product_card, product_card_skeleton};

/// Async source of the products shown in one section.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch(&self) -> CatalogResult<Vec<Product>>;
}

/// One independently resolved product grid.
#[derive(Clone)]
pub struct GridSection {
    /// DOM id of the slot the cards are swapped into.
    pub slot: &'static str,
    pub title: Option<String>,
    /// Adds a "View All" link to `/products` next to the title.
    pub view_all: bool,
    /// Skeleton cards shown until the fetch resolves.
    pub placeholders: usize,
    pub source: Arc<dyn ProductSource>,
}

impl std::fmt::Debug for GridSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridSection")
            .field("slot", &self.slot)
            .field("title", &self.title)
            .field("placeholders", &self.placeholders)
            .finish_non_exhaustive()
    }
}

impl GridSection {
    fn placeholder(&self) -> Node {
        let mut section = Element::new("section").class("product-section");

        if let Some(title) = &self.title {
            let mut header = Element::new("div")
                .class("section-header")
                .child(Element::new("h2").text(title.clone()));
            if self.view_all {
                header = header.child(
                    Element::new("a")
                        .class("view-all")
                        .attr("href", "/products")
                        .text("View All \u{2192}"),
                );
            }
            section = section.child(header);
        }

        section
            .child(
                Element::new("div")
                    .class("product-grid")
                    .id(self.slot)
                    .children((0..self.placeholders).map(|_| product_card_skeleton())),
            )
            .into()
    }

    async fn resolve(&self) -> String {
        let content: Node = match self.source.fetch().await {
            Ok(products) => {
                tracing::debug!(slot = self.slot, count = products.len(), "section resolved");
                Node::fragment(products.iter().map(product_card))
            }
            Err(err) => {
                tracing::error!(slot = self.slot, error = %err, "section failed to load");
                Element::new("p")
                    .class("section-error")
                    .text("Products could not be loaded right now.")
                    .into()
            }
        };

        let template: Node = Element::new("template")
            .id(format!("{}-content", self.slot))
            .child(content)
            .into();

        let mut out = template.to_html();
        out.push_str(&format!("<script>$swap(\"{}\")</script>", self.slot));
        out
    }
}

/// The shell chunk: layout head plus every section in its loading state.
pub fn shell(title: &str, sections: &[GridSection]) -> String {
    let mut out = layout::open(title);
    for section in sections {
        section.placeholder().write_html(&mut out);
    }
    out
}

/// Stream a page of deferred sections.
///
/// Must be called inside a Tokio runtime: section fetches are spawned
/// immediately. If the client goes away, remaining chunks are dropped.
pub fn render(title: &str, sections: Vec<GridSection>) -> impl Stream<Item = String> + Send + 'static {
    let head = shell(title, &sections);
    let (tx, rx) = mpsc::channel::<String>(sections.len().max(1));

    for section in sections {
        let tx = tx.clone();
        tokio::spawn(async move {
            let chunk = section.resolve().await;
            if tx.send(chunk).await.is_err() {
                tracing::debug!(slot = section.slot, "client gone before section resolved");
            }
        });
    }
    drop(tx);

    tokio_stream::once(head)
        .chain(ReceiverStream::new(rx))
        .chain(tokio_stream::once(layout::close()))
}

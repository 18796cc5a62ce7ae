use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use storefront_core::{DownloadVerificationId, Entity, ProductId};
use storefront_products::{ListingCandidate, Product, ProductQuery, select_listing};
use storefront_sales::{DownloadVerification, Order};

use super::{Catalog, CatalogError, CatalogResult, CatalogWriter};

/// In-memory catalog for tests/dev.
///
/// Products keep insertion order, which is also the tie order of listings.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<Vec<Product>>,
    orders: RwLock<Vec<Order>>,
    verifications: RwLock<HashMap<DownloadVerificationId, DownloadVerification>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&self, product: Product) {
        if let Ok(mut products) = self.products.write() {
            replace_or_push(&mut products, product);
        }
    }

    pub fn insert_order(&self, order: Order) {
        if let Ok(mut orders) = self.orders.write() {
            orders.push(order);
        }
    }

    pub fn insert_verification_record(&self, verification: DownloadVerification) {
        if let Ok(mut map) = self.verifications.write() {
            map.insert(verification.id, verification);
        }
    }

    /// Flip a product's availability flag. Returns `false` if it does not exist.
    pub fn set_available(&self, id: ProductId, available: bool) -> bool {
        let Ok(mut products) = self.products.write() else {
            return false;
        };
        match products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.is_available_for_purchase = available;
                true
            }
            None => false,
        }
    }

    fn order_counts(&self) -> CatalogResult<HashMap<ProductId, u64>> {
        let orders = self.orders.read().map_err(|_| poisoned("orders"))?;
        let mut counts = HashMap::new();
        for order in orders.iter() {
            *counts.entry(order.product_id).or_insert(0u64) += 1;
        }
        Ok(counts)
    }
}

/// Replace the entity with the same id in place, or append it.
fn replace_or_push<E: Entity>(items: &mut Vec<E>, item: E) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

fn poisoned(what: &str) -> CatalogError {
    CatalogError::Unavailable(format!("{what} lock poisoned"))
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn find_products(&self, query: &ProductQuery) -> CatalogResult<Vec<Product>> {
        let counts = self.order_counts()?;
        let products = self.products.read().map_err(|_| poisoned("products"))?;

        let candidates = products.iter().map(|p| ListingCandidate {
            product: p.clone(),
            order_count: counts.get(&p.id).copied().unwrap_or(0),
        });

        Ok(select_listing(candidates, query))
    }

    async fn get_product(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        let products = self.products.read().map_err(|_| poisoned("products"))?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_verification(
        &self,
        id: DownloadVerificationId,
    ) -> CatalogResult<Option<DownloadVerification>> {
        let map = self.verifications.read().map_err(|_| poisoned("verifications"))?;
        Ok(map.get(&id).cloned())
    }
}

#[async_trait]
impl CatalogWriter for InMemoryCatalog {
    async fn upsert_product(&self, product: &Product) -> CatalogResult<()> {
        self.insert_product(product.clone());
        Ok(())
    }

    async fn record_order(&self, order: &Order) -> CatalogResult<()> {
        self.insert_order(order.clone());
        Ok(())
    }

    async fn insert_verification(&self, verification: &DownloadVerification) -> CatalogResult<()> {
        self.insert_verification_record(verification.clone());
        Ok(())
    }
}

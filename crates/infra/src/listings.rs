//! Product listings served to the storefront pages.
//!
//! Each listing is a catalog query behind the [`QueryCache`], keyed by the
//! page route it belongs to plus a fixed label.

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use storefront_products::{Product, ProductQuery};

use crate::cache::{CacheKey, QueryCache};
use crate::catalog::{Catalog, CatalogResult};

/// One day: how long the most-popular listing is served from cache.
pub const POPULAR_REVALIDATE: Duration = Duration::from_secs(60 * 60 * 24);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingsConfig {
    /// Route owning the cached listings; first part of every cache key.
    pub route: String,
    pub popular_revalidate: Duration,
    pub cache_capacity: u64,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            route: "/".to_string(),
            popular_revalidate: POPULAR_REVALIDATE,
            cache_capacity: 1024,
        }
    }
}

/// Cached product fetchers for the storefront.
pub struct ProductListings {
    catalog: Arc<dyn Catalog>,
    cache: QueryCache<Vec<Product>>,
    popular_key: CacheKey,
    newest_key: CacheKey,
    popular_revalidate: Duration,
}

impl std::fmt::Debug for ProductListings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductListings")
            .field("popular_key", &self.popular_key)
            .field("newest_key", &self.newest_key)
            .field("popular_revalidate", &self.popular_revalidate)
            .finish_non_exhaustive()
    }
}

impl ProductListings {
    pub fn new(catalog: Arc<dyn Catalog>, config: ListingsConfig) -> Self {
        Self {
            catalog,
            cache: QueryCache::new(config.cache_capacity),
            popular_key: CacheKey::new([config.route.as_str(), "getMostPopularProducts"]),
            newest_key: CacheKey::new([config.route.as_str(), "getNewestProducts"]),
            popular_revalidate: config.popular_revalidate,
        }
    }

    /// Up to six available products with the most orders, revalidated daily.
    #[instrument(skip(self), err)]
    pub async fn most_popular(&self) -> CatalogResult<Vec<Product>> {
        self.cache
            .get_or_load(&self.popular_key, Some(self.popular_revalidate), || async move {
                self.catalog.find_products(&ProductQuery::most_popular()).await
            })
            .await
    }

    /// Up to six most recently created available products, loaded on every call.
    #[instrument(skip(self), err)]
    pub async fn newest(&self) -> CatalogResult<Vec<Product>> {
        self.cache
            .get_or_load(&self.newest_key, None, || async move {
                self.catalog.find_products(&ProductQuery::newest()).await
            })
            .await
    }

    /// Every available product, alphabetically. Not cached.
    #[instrument(skip(self), err)]
    pub async fn all_available(&self) -> CatalogResult<Vec<Product>> {
        self.catalog.find_products(&ProductQuery::all_by_name()).await
    }
}

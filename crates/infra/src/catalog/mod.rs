//! Catalog query interface.
//!
//! The storefront only ever reads products through [`Catalog`]; writes go
//! through [`CatalogWriter`], used for seeding and by upstream checkout code.

use async_trait::async_trait;
use thiserror::Error;

use storefront_core::{DownloadVerificationId, ProductId};
use storefront_products::{Product, ProductQuery};
use storefront_sales::{DownloadVerification, Order};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;

/// Catalog storage failure.
///
/// `Clone` so one failed load can be handed to every caller waiting on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog store unavailable: {0}")]
    Unavailable(String),

    #[error("catalog query failed: {0}")]
    Query(String),

    #[error("corrupt catalog row: {0}")]
    Decode(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read side of the catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Available products ordered and capped per `query`.
    async fn find_products(&self, query: &ProductQuery) -> CatalogResult<Vec<Product>>;

    async fn get_product(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    async fn find_verification(
        &self,
        id: DownloadVerificationId,
    ) -> CatalogResult<Option<DownloadVerification>>;
}

/// Write side of the catalog.
#[async_trait]
pub trait CatalogWriter: Send + Sync {
    /// Insert a product, replacing any product with the same id.
    async fn upsert_product(&self, product: &Product) -> CatalogResult<()>;

    async fn record_order(&self, order: &Order) -> CatalogResult<()>;

    async fn insert_verification(&self, verification: &DownloadVerification) -> CatalogResult<()>;
}

//! Infrastructure wiring: catalog backend, cached listings, email settings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use uuid::Uuid;

use storefront_core::{Cents, DownloadVerificationId, OrderId, ProductId};
use storefront_email::EmailSettings;
use storefront_infra::catalog::{
    Catalog, CatalogError, CatalogResult, CatalogWriter, InMemoryCatalog, PostgresCatalog,
};
use storefront_infra::listings::{ListingsConfig, ProductListings};
use storefront_products::{NewProduct, Product};
use storefront_sales::{DownloadVerification, Order, default_download_validity};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<dyn Catalog>,
    pub listings: Arc<ProductListings>,
    pub email: EmailSettings,
    pub product_files_dir: PathBuf,
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("listings", &self.listings)
            .field("email", &self.email)
            .field("product_files_dir", &self.product_files_dir)
            .finish_non_exhaustive()
    }
}

impl AppServices {
    /// Wire services around an existing catalog.
    pub fn new(catalog: Arc<dyn Catalog>, config: &AppConfig) -> anyhow::Result<Self> {
        let listings = ProductListings::new(
            catalog.clone(),
            ListingsConfig {
                popular_revalidate: config.popular_revalidate,
                cache_capacity: config.query_cache_capacity,
                ..ListingsConfig::default()
            },
        );
        let email = EmailSettings::new(config.server_url.clone()).context("invalid SERVER_URL")?;

        Ok(Self {
            catalog,
            listings: Arc::new(listings),
            email,
            product_files_dir: config.product_files_dir.clone(),
        })
    }
}

/// Connect the configured catalog backend and wire services around it.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let catalog: Arc<dyn Catalog> = match &config.database_url {
        Some(url) => {
            let catalog = PostgresCatalog::connect(url, config.database_max_connections)
                .await
                .context("failed to connect to DATABASE_URL")?;
            catalog
                .ensure_schema()
                .await
                .context("failed to create catalog schema")?;
            if config.seed_demo_data {
                seed_demo_catalog(&catalog).await.context("failed to seed catalog")?;
                write_demo_files(&config.product_files_dir).await?;
            }
            tracing::info!("using postgres catalog");
            Arc::new(catalog)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using seeded in-memory catalog");
            let catalog = InMemoryCatalog::new();
            seed_demo_catalog(&catalog).await.context("failed to seed catalog")?;
            write_demo_files(&config.product_files_dir).await?;
            Arc::new(catalog)
        }
    };

    AppServices::new(catalog, config)
}

struct DemoProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
    orders: usize,
    age_days: i64,
    available: bool,
}

const DEMO_ID_BASE: u128 = 0x5eed_0000_0000_7000_8000_0000_0000_0000;

const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        name: "Ownership in Practice",
        description: "A hands-on course on borrowing, lifetimes and smart pointers.",
        price: 4_900,
        orders: 42,
        age_days: 120,
        available: true,
    },
    DemoProduct {
        name: "Async Services Handbook",
        description: "Build and operate Tokio services, from the first listener to graceful shutdown.",
        price: 3_900,
        orders: 35,
        age_days: 90,
        available: true,
    },
    DemoProduct {
        name: "Parser Combinators Workbook",
        description: "Write fast, well-typed parsers for real file formats.",
        price: 2_900,
        orders: 27,
        age_days: 60,
        available: true,
    },
    DemoProduct {
        name: "SQL for Application Developers",
        description: "Query plans, indexes and transactions explained with working examples.",
        price: 3_500,
        orders: 19,
        age_days: 45,
        available: true,
    },
    DemoProduct {
        name: "Embedded Rust Starter Kit",
        description: "Firmware projects for common microcontrollers.",
        price: 5_900,
        orders: 12,
        age_days: 30,
        available: true,
    },
    DemoProduct {
        name: "Command-Line Tools Cookbook",
        description: "Recipes for argument parsing, configuration and friendly errors.",
        price: 1_900,
        orders: 8,
        age_days: 14,
        available: true,
    },
    DemoProduct {
        name: "WebAssembly Field Notes",
        description: "Ship Rust to the browser and the edge.",
        price: 2_400,
        orders: 3,
        age_days: 3,
        available: true,
    },
    DemoProduct {
        name: "Legacy Bundle 2019",
        description: "Retired bundle kept for existing customers.",
        price: 9_900,
        orders: 80,
        age_days: 700,
        available: false,
    },
];

fn demo_file_path(index: usize) -> String {
    format!("demo/product-{index}.txt")
}

/// Write the downloadable file of every demo product under `dir`.
pub async fn write_demo_files(dir: &Path) -> anyhow::Result<()> {
    for (index, demo) in DEMO_PRODUCTS.iter().enumerate() {
        let path = dir.join(demo_file_path(index));
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, format!("{}\n\n{}\n", demo.name, demo.description))
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Load a small demo catalog: products, orders and one download link per
/// product. Product ids are stable, so reseeding updates products in place.
pub async fn seed_demo_catalog(writer: &dyn CatalogWriter) -> CatalogResult<()> {
    let now = Utc::now();

    for (index, demo) in DEMO_PRODUCTS.iter().enumerate() {
        let id = ProductId::from_uuid(Uuid::from_u128(DEMO_ID_BASE + index as u128));
        let mut product = Product::create(
            id,
            NewProduct {
                name: demo.name.to_string(),
                description: demo.description.to_string(),
                image_path: format!("/products/demo-{index}.png"),
                file_path: demo_file_path(index),
                price: Cents::new(demo.price),
                is_available_for_purchase: true,
            },
            now - Duration::days(demo.age_days),
        )
        .map_err(|e| CatalogError::Query(e.to_string()))?;
        writer.upsert_product(&product).await?;

        for _ in 0..demo.orders {
            let order = Order::place(OrderId::new(), &product, now)
                .map_err(|e| CatalogError::Query(e.to_string()))?;
            writer.record_order(&order).await?;
        }

        if !demo.available {
            product.is_available_for_purchase = false;
            writer.upsert_product(&product).await?;
        }

        let verification = DownloadVerification::issue(
            DownloadVerificationId::new(),
            product.id,
            now,
            default_download_validity(),
        );
        writer.insert_verification(&verification).await?;
        tracing::debug!(
            product = %product.name,
            download = %format!("/products/download/{}", verification.id),
            "seeded demo product"
        );
    }

    tracing::info!(products = DEMO_PRODUCTS.len(), "demo catalog seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_seed_fills_home_sections() {
        let catalog = Arc::new(InMemoryCatalog::new());
        seed_demo_catalog(catalog.as_ref()).await.unwrap();

        let services = AppServices::new(catalog, &AppConfig::default()).unwrap();
        let popular = services.listings.most_popular().await.unwrap();
        let newest = services.listings.newest().await.unwrap();

        assert_eq!(popular.len(), 6);
        assert_eq!(popular[0].name, "Ownership in Practice");
        assert_eq!(newest[0].name, "WebAssembly Field Notes");
        assert!(popular.iter().chain(&newest).all(|p| p.is_available_for_purchase));
    }

    #[tokio::test]
    async fn reseeding_keeps_product_ids_stable() {
        let catalog = InMemoryCatalog::new();
        seed_demo_catalog(&catalog).await.unwrap();
        seed_demo_catalog(&catalog).await.unwrap();

        let all = catalog
            .find_products(&storefront_products::ProductQuery::all_by_name())
            .await
            .unwrap();
        assert_eq!(all.len(), DEMO_PRODUCTS.len() - 1);
    }

    #[tokio::test]
    async fn every_seeded_product_has_its_file_written() {
        let dir = std::env::temp_dir().join(format!("storefront-demo-{}", Uuid::now_v7()));
        let catalog = InMemoryCatalog::new();
        seed_demo_catalog(&catalog).await.unwrap();
        write_demo_files(&dir).await.unwrap();

        for index in 0..DEMO_PRODUCTS.len() {
            let id = ProductId::from_uuid(Uuid::from_u128(DEMO_ID_BASE + index as u128));
            let product = catalog.get_product(id).await.unwrap().unwrap();
            let contents = std::fs::read_to_string(dir.join(&product.file_path)).unwrap();
            assert!(contents.starts_with(&product.name));
        }
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let config = AppConfig {
            server_url: "ftp://shop".to_string(),
            ..AppConfig::default()
        };

        assert!(AppServices::new(Arc::new(InMemoryCatalog::new()), &config).is_err());
    }
}

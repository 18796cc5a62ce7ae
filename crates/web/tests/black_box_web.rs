use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::StatusCode;

use storefront_core::{Cents, DownloadVerificationId, OrderId, ProductId};
use storefront_infra::catalog::InMemoryCatalog;
use storefront_products::{NewProduct, Product};
use storefront_sales::{DownloadVerification, Order};
use storefront_web::app::{build_app, services::AppServices};
use storefront_web::config::AppConfig;

struct TestServer {
    base_url: String,
    catalog: Arc<InMemoryCatalog>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(files_dir: PathBuf) -> Self {
        // Same router as prod, over an in-memory catalog the test can write to.
        let catalog = Arc::new(InMemoryCatalog::new());
        let config = AppConfig {
            product_files_dir: files_dir,
            ..AppConfig::default()
        };
        let services = AppServices::new(catalog.clone(), &config).expect("services");
        let app = build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            catalog,
            handle,
        }
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(format!("{}{}", self.base_url, path)).await.unwrap()
    }

    fn add_product(&self, name: &str, age_days: i64, orders: usize) -> Product {
        let product = Product::create(
            ProductId::new(),
            NewProduct {
                name: name.to_string(),
                description: format!("All about {name}"),
                image_path: format!("/products/{name}.png"),
                file_path: format!("{name}.txt"),
                price: Cents::new(1_000),
                is_available_for_purchase: true,
            },
            Utc::now() - Duration::days(age_days),
        )
        .unwrap();
        self.catalog.insert_product(product.clone());
        for _ in 0..orders {
            self.catalog
                .insert_order(Order::place(OrderId::new(), &product, Utc::now()).unwrap());
        }
        product
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("storefront-web-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Resolved content of one deferred section.
fn section<'a>(body: &'a str, slot: &str) -> &'a str {
    let start = body
        .find(&format!(r#"<template id="{slot}-content">"#))
        .unwrap_or_else(|| panic!("section {slot} never resolved"));
    let end = start + body[start..].find("</template>").unwrap();
    &body[start..end]
}

fn card_names(html: &str) -> Vec<&str> {
    html.split("<h3>")
        .skip(1)
        .filter_map(|rest| rest.split("</h3>").next())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn(temp_dir()).await;

    assert_eq!(srv.get("/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn home_streams_skeletons_then_both_sections() {
    let srv = TestServer::spawn(temp_dir()).await;
    for (i, name) in ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf"]
        .into_iter()
        .enumerate()
    {
        srv.add_product(name, i as i64, 7 - i);
    }
    let hidden = srv.add_product("retired", 30, 100);
    srv.catalog.set_available(hidden.id, false);

    let res = srv.get("/").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
    let body = res.text().await.unwrap();

    assert_eq!(body.matches(r#"class="card product-card-skeleton"#).count(), 6);
    assert!(body.find("Most Popular") < body.find("Newest"));
    assert_eq!(
        card_names(section(&body, "most-popular")),
        vec!["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"]
    );
    assert_eq!(
        card_names(section(&body, "newest")),
        vec!["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"]
    );
    assert!(!body.contains("retired"));
    assert!(body.trim_end().ends_with("</html>"));
}

#[tokio::test]
async fn popular_is_cached_while_newest_stays_live() {
    let srv = TestServer::spawn(temp_dir()).await;
    srv.add_product("steady", 5, 3);

    let first = srv.get("/").await.text().await.unwrap();
    assert_eq!(card_names(section(&first, "most-popular")), vec!["steady"]);

    srv.add_product("hot", 0, 50);
    let second = srv.get("/").await.text().await.unwrap();

    assert_eq!(card_names(section(&second, "most-popular")), vec!["steady"]);
    assert_eq!(card_names(section(&second, "newest")), vec!["hot", "steady"]);
}

#[tokio::test]
async fn products_page_lists_everything_alphabetically() {
    let srv = TestServer::spawn(temp_dir()).await;
    for name in ["m", "c", "x", "a", "q", "b", "z", "k"] {
        srv.add_product(name, 0, 0);
    }

    let body = srv.get("/products").await.text().await.unwrap();

    assert_eq!(body.matches(r#"class="card product-card-skeleton"#).count(), 6);
    assert_eq!(
        card_names(section(&body, "all-products")),
        vec!["a", "b", "c", "k", "m", "q", "x", "z"]
    );
}

#[tokio::test]
async fn valid_download_returns_the_file() {
    let dir = temp_dir();
    std::fs::write(dir.join("manual.txt"), b"chapter one").unwrap();
    let srv = TestServer::spawn(dir).await;
    let product = srv.add_product("manual", 0, 0);
    let verification = DownloadVerification::issue(
        DownloadVerificationId::new(),
        product.id,
        Utc::now(),
        Duration::hours(24),
    );
    srv.catalog.insert_verification_record(verification.clone());

    let res = srv.get(&format!("/products/download/{}", verification.id)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["content-disposition"],
        r#"attachment; filename="manual.txt""#
    );
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"chapter one");
}

#[tokio::test]
async fn expired_unknown_and_malformed_links_land_on_expired_page() {
    let srv = TestServer::spawn(temp_dir()).await;
    let product = srv.add_product("manual", 0, 0);
    let expired = DownloadVerification::issue(
        DownloadVerificationId::new(),
        product.id,
        Utc::now() - Duration::hours(25),
        Duration::hours(24),
    );
    srv.catalog.insert_verification_record(expired.clone());

    for id in [
        expired.id.to_string(),
        DownloadVerificationId::new().to_string(),
        "not-a-uuid".to_string(),
    ] {
        let res = srv.get(&format!("/products/download/{id}")).await;
        assert_eq!(res.url().path(), "/products/download/expired");
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.text().await.unwrap().contains("Download link expired"));
    }
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let srv = TestServer::spawn(temp_dir()).await;
    let product = srv.add_product("ghost", 0, 0);
    let verification = DownloadVerification::issue(
        DownloadVerificationId::new(),
        product.id,
        Utc::now(),
        Duration::hours(24),
    );
    srv.catalog.insert_verification_record(verification.clone());

    let res = srv.get(&format!("/products/download/{}", verification.id)).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purchase_receipt_preview_renders_html_and_text() {
    let srv = TestServer::spawn(temp_dir()).await;

    let html = srv.get("/emails/purchase-receipt/preview").await.text().await.unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Purchase Receipt"));
    assert!(html.contains("Download Product name and view receipt"));
    assert!(html.contains("http://localhost:8080/products/download/"));

    let res = srv.get("/emails/purchase-receipt/preview?format=text").await;
    assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/plain"));
    let text = res.text().await.unwrap();
    assert!(text.contains("Price Paid\n$100.00"));

    let res = srv.get("/emails/purchase-receipt/preview?format=json").await;
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["subject"], "Order Confirmation");
    assert_eq!(body["props"]["product"]["name"], "Product name");
    assert_eq!(body["props"]["order"]["price_paid"], 10000);
    assert!(body["html"].as_str().unwrap().contains("Purchase Receipt"));
}

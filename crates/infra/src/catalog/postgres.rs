//! Postgres-backed catalog.
//!
//! Listings are pushed down to SQL: the order count is a `COUNT` over a
//! `LEFT JOIN` on `orders`, so products without orders still rank (last).
//!
//! ## Error Mapping
//!
//! | SQLx Error | CatalogError |
//! |------------|--------------|
//! | PoolClosed / PoolTimedOut / Io | `Unavailable` |
//! | ColumnDecode / ColumnNotFound / Decode | `Decode` |
//! | anything else | `Query` |

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use async_trait::async_trait;

use storefront_core::{Cents, DownloadVerificationId, ProductId};
use storefront_products::{Product, ProductOrdering, ProductQuery};
use storefront_sales::{DownloadVerification, Order};

use super::{Catalog, CatalogError, CatalogResult, CatalogWriter};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id                         UUID PRIMARY KEY,
        name                       TEXT NOT NULL,
        description                TEXT NOT NULL,
        image_path                 TEXT NOT NULL,
        file_path                  TEXT NOT NULL,
        price_in_cents             BIGINT NOT NULL CHECK (price_in_cents > 0),
        is_available_for_purchase  BOOLEAN NOT NULL DEFAULT TRUE,
        created_at                 TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id                   UUID PRIMARY KEY,
        product_id           UUID NOT NULL REFERENCES products (id) ON DELETE RESTRICT,
        price_paid_in_cents  BIGINT NOT NULL,
        created_at           TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS orders_product_id_idx ON orders (product_id)",
    r#"
    CREATE TABLE IF NOT EXISTS download_verifications (
        id          UUID PRIMARY KEY,
        product_id  UUID NOT NULL REFERENCES products (id) ON DELETE CASCADE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        expires_at  TIMESTAMPTZ NOT NULL
    )
    "#,
];

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.image_path, p.file_path, \
    p.price_in_cents, p.is_available_for_purchase, p.created_at";

/// Postgres-backed catalog.
///
/// `PgPool` is internally reference counted, so clones share connections.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> CatalogResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the catalog tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> CatalogResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }
}

fn order_by(ordering: ProductOrdering) -> &'static str {
    match ordering {
        ProductOrdering::MostOrdered => "COUNT(o.id) DESC",
        ProductOrdering::Newest => "p.created_at DESC",
        // Matches `select_listing`: lowercase, then byte order.
        ProductOrdering::Name => r#"LOWER(p.name) COLLATE "C" ASC, p.name COLLATE "C" ASC"#,
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    #[instrument(
        skip(self, query),
        fields(ordering = ?query.ordering, limit = ?query.limit, row_count = tracing::field::Empty),
        err
    )]
    async fn find_products(&self, query: &ProductQuery) -> CatalogResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN orders o ON o.product_id = p.id
            WHERE p.is_available_for_purchase = TRUE
            GROUP BY p.id
            ORDER BY {}
            LIMIT $1
            "#,
            order_by(query.ordering)
        );

        // `LIMIT NULL` means no limit.
        let limit = query.limit.map(|l| l as i64);

        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_products", e))?;

        let products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("find_products", e))?;

        Span::current().record("row_count", products.len());
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get_product(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1");

        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_product", e))?;

        row.as_ref()
            .map(product_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("get_product", e))
    }

    #[instrument(skip(self), fields(verification_id = %id), err)]
    async fn find_verification(
        &self,
        id: DownloadVerificationId,
    ) -> CatalogResult<Option<DownloadVerification>> {
        let row = sqlx::query(
            r#"
            SELECT id, product_id, created_at, expires_at
            FROM download_verifications
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_verification", e))?;

        row.as_ref()
            .map(verification_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("find_verification", e))
    }
}

#[async_trait]
impl CatalogWriter for PostgresCatalog {
    async fn upsert_product(&self, product: &Product) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, image_path, file_path,
                price_in_cents, is_available_for_purchase, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id)
            DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                image_path = EXCLUDED.image_path,
                file_path = EXCLUDED.file_path,
                price_in_cents = EXCLUDED.price_in_cents,
                is_available_for_purchase = EXCLUDED.is_available_for_purchase
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.image_path)
        .bind(&product.file_path)
        .bind(product.price.as_i64())
        .bind(product.is_available_for_purchase)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_product", e))?;
        Ok(())
    }

    async fn record_order(&self, order: &Order) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, product_id, price_paid_in_cents, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.product_id.as_uuid())
        .bind(order.price_paid.as_i64())
        .bind(order.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("record_order", e))?;
        Ok(())
    }

    async fn insert_verification(&self, verification: &DownloadVerification) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO download_verifications (id, product_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(verification.id.as_uuid())
        .bind(verification.product_id.as_uuid())
        .bind(verification.created_at)
        .bind(verification.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_verification", e))?;
        Ok(())
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    let id: uuid::Uuid = row.try_get("id")?;
    let price_in_cents: i64 = row.try_get("price_in_cents")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Product {
        id: ProductId::from_uuid(id),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        image_path: row.try_get("image_path")?,
        file_path: row.try_get("file_path")?,
        price: Cents::new(price_in_cents),
        is_available_for_purchase: row.try_get("is_available_for_purchase")?,
        created_at,
    })
}

fn verification_from_row(row: &PgRow) -> Result<DownloadVerification, sqlx::Error> {
    let id: uuid::Uuid = row.try_get("id")?;
    let product_id: uuid::Uuid = row.try_get("product_id")?;

    Ok(DownloadVerification {
        id: DownloadVerificationId::from_uuid(id),
        product_id: ProductId::from_uuid(product_id),
        created_at: row.try_get("created_at")?,
        expires_at: row.try_get("expires_at")?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> CatalogError {
    match err {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            CatalogError::Unavailable(format!("{operation}: {err}"))
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => CatalogError::Decode(format!("{operation}: {err}")),
        sqlx::Error::Database(db_err) => {
            CatalogError::Query(format!("database error in {operation}: {}", db_err.message()))
        }
        other => CatalogError::Query(format!("{operation}: {other}")),
    }
}

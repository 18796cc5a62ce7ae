use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Cents, DomainError, DomainResult, Entity, ProductId};

/// A digital product sold in the storefront.
///
/// This is the catalog record as read by the customer-facing pages. The
/// number of orders placed for it lives with the orders and is derived by the
/// query layer, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Public path of the product image, relative to the server root.
    pub image_path: String,
    /// Location of the downloadable file on the server.
    pub file_path: String,
    pub price: Cents,
    pub is_available_for_purchase: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub image_path: String,
    pub file_path: String,
    pub price: Cents,
    pub is_available_for_purchase: bool,
}

impl Product {
    /// Validate `input` and build a product created at `now`.
    pub fn create(id: ProductId, input: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        let NewProduct {
            name,
            description,
            image_path,
            file_path,
            price,
            is_available_for_purchase,
        } = input;

        let name = required("name", name)?;
        let description = required("description", description)?;
        let image_path = required("image_path", image_path)?;
        let file_path = required("file_path", file_path)?;

        if !image_path.starts_with('/') {
            return Err(DomainError::validation(
                "image_path must be absolute (start with '/')",
            ));
        }

        if !price.is_positive() {
            return Err(DomainError::validation("price must be at least 1 cent"));
        }

        Ok(Self {
            id,
            name,
            description,
            image_path,
            file_path,
            price,
            is_available_for_purchase,
            created_at: now,
        })
    }

    /// Whether customers can currently buy (and therefore see) the product.
    pub fn can_be_sold(&self) -> bool {
        self.is_available_for_purchase
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn required(field: &str, value: String) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

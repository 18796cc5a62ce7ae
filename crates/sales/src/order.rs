use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Cents, DomainError, DomainResult, Entity, OrderId, ProductId};
use storefront_products::Product;

/// A completed purchase of a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product_id: ProductId,
    /// Amount charged, in integer minor-currency units.
    pub price_paid: Cents,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Record a purchase of `product` at its current price.
    pub fn place(id: OrderId, product: &Product, now: DateTime<Utc>) -> DomainResult<Self> {
        if !product.can_be_sold() {
            return Err(DomainError::validation(format!(
                "product {} is not available for purchase",
                product.id
            )));
        }

        Ok(Self {
            id,
            product_id: product.id,
            price_paid: product.price,
            created_at: now,
        })
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

//! Storefront listing rules: which products show up, in which order, how many.
//!
//! Every listing only ever contains products flagged available for purchase.
//! Ties on the ordering key keep the order in which candidates were supplied;
//! callers must not rely on any particular tie order.

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Number of products shown in each home page section.
pub const HOME_SECTION_LIMIT: usize = 6;

/// Ordering key of a listing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductOrdering {
    /// Descending number of orders placed for the product.
    MostOrdered,
    /// Descending creation time.
    Newest,
    /// Ascending name, ignoring case; names equal ignoring case fall back
    /// to byte order.
    Name,
}

/// A listing request: available products, ordered, optionally capped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductQuery {
    pub ordering: ProductOrdering,
    pub limit: Option<usize>,
}

impl ProductQuery {
    /// Top products by order count, capped at the home section size.
    pub fn most_popular() -> Self {
        Self {
            ordering: ProductOrdering::MostOrdered,
            limit: Some(HOME_SECTION_LIMIT),
        }
    }

    /// Most recently created products, capped at the home section size.
    pub fn newest() -> Self {
        Self {
            ordering: ProductOrdering::Newest,
            limit: Some(HOME_SECTION_LIMIT),
        }
    }

    /// Every available product, alphabetically.
    pub fn all_by_name() -> Self {
        Self {
            ordering: ProductOrdering::Name,
            limit: None,
        }
    }
}

/// A product together with the number of orders placed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCandidate {
    pub product: Product,
    pub order_count: u64,
}

/// Apply `query` to a set of candidates.
///
/// Used by stores that cannot push the query down to a database.
pub fn select_listing(
    candidates: impl IntoIterator<Item = ListingCandidate>,
    query: &ProductQuery,
) -> Vec<Product> {
    let mut available: Vec<ListingCandidate> = candidates
        .into_iter()
        .filter(|c| c.product.can_be_sold())
        .collect();

    // `sort_by` is stable, so ties keep the supplied order.
    match query.ordering {
        ProductOrdering::MostOrdered => {
            available.sort_by(|a, b| b.order_count.cmp(&a.order_count));
        }
        ProductOrdering::Newest => {
            available.sort_by(|a, b| b.product.created_at.cmp(&a.product.created_at));
        }
        ProductOrdering::Name => {
            available.sort_by_cached_key(|c| (c.product.name.to_lowercase(), c.product.name.clone()));
        }
    }

    if let Some(limit) = query.limit {
        available.truncate(limit);
    }

    available.into_iter().map(|c| c.product).collect()
}

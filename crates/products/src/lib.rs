//! Products domain module.
//!
//! This crate contains the catalog record and the rules for the storefront
//! listings, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod listing;
pub mod product;

pub use listing::{HOME_SECTION_LIMIT, ListingCandidate, ProductOrdering, ProductQuery, select_listing};
pub use product::{NewProduct, Product};

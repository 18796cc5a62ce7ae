//! Infrastructure layer: catalog storage, query cache, cached listings.

pub mod cache;
pub mod catalog;
pub mod listings;

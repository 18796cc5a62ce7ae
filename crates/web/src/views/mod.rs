//! Server-rendered views.
//!
//! - `layout`: document shell shared by every page
//! - `product_card`: product card and its loading skeleton
//! - `deferred`: streamed sections that swap placeholders for content
//! - `pages`: page compositions (home, all products)

pub mod deferred;
pub mod layout;
pub mod pages;
pub mod product_card;

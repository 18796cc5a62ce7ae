//! Static markup trees for server-rendered pages and emails.
//!
//! Views build a [`Node`] tree and serialize it once. Text and attribute
//! values are always escaped on output, so user-supplied strings (product
//! names, descriptions, ids) can never inject markup.

pub mod escape;
pub mod node;

pub use escape::{escape_attr, escape_text};
pub use node::{Element, Node};

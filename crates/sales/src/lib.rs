//! Sales domain module: completed orders and the download verifications
//! issued for them.
//!
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod download;
pub mod order;

pub use download::{DownloadVerification, default_download_validity};
pub use order::Order;

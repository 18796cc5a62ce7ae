//! Transactional emails.
//!
//! Renderers are pure: the same inputs always produce the same [`Document`].
//! Sending is left to whatever mail transport the caller uses.

pub mod document;
pub mod format;
pub mod order_information;
pub mod purchase_receipt;
pub mod settings;

pub use document::Document;
pub use order_information::{OrderInformation, ReceiptOrder, ReceiptProduct};
pub use purchase_receipt::PurchaseReceiptEmail;
pub use settings::{EmailError, EmailSettings};

//! Display formatting for amounts and dates in emails.

use chrono::{DateTime, Utc};

use storefront_core::Cents;

/// `$1,234.50`
pub fn format_currency(amount: Cents) -> String {
    amount.to_string()
}

/// Medium date style, e.g. `Oct 19, 2026`.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

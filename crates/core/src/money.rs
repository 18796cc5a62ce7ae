//! Money in integer minor-currency units.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// An amount in cents (USD minor units).
///
/// Stored as `i64` to match the relational column type; prices are validated
/// to be positive where they are created, not here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn as_i64(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl ValueObject for Cents {}

/// Formats as US dollars with grouped thousands, e.g. `$1,234.50`.
impl core::fmt::Display for Cents {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = abs / 100;
        let cents = abs % 100;

        let digits = dollars.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{sign}${grouped}.{cents:02}")
    }
}

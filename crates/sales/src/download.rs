//! Download verification tokens.
//!
//! A verification authorizes downloading one product's file until it expires.
//! Its id travels to the customer inside the receipt email link.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{DownloadVerificationId, Entity, ProductId};

/// How long a freshly issued verification stays redeemable.
pub fn default_download_validity() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadVerification {
    pub id: DownloadVerificationId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DownloadVerification {
    /// Issue a verification for `product_id`, valid for `valid_for` from `now`.
    pub fn issue(
        id: DownloadVerificationId,
        product_id: ProductId,
        now: DateTime<Utc>,
        valid_for: Duration,
    ) -> Self {
        Self {
            id,
            product_id,
            created_at: now,
            expires_at: now + valid_for,
        }
    }

    /// The verification is redeemable strictly before `expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl Entity for DownloadVerification {
    type Id = DownloadVerificationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

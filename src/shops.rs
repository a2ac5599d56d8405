//! Shops

use chrono::{DateTime, Utc};
use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use slotmap::new_key_type;
use thiserror::Error;

use crate::{
    eco::{self, EcoProfile, EcoTier},
    nonprofits::NonprofitKey,
};

new_key_type! {
    /// Shop Key
    pub struct ShopKey;
}

/// Errors related to shop configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    /// Donation percentage must be a fraction within 0–1 (0–100%).
    #[error("Donation percentage {0} is outside 0-100%")]
    DonationPercentOutOfRange(Decimal),
}

/// A seller's storefront.
///
/// Owns the donation configuration the splitter reads and an eco profile
/// with its two derived score fields.
#[derive(Debug, Clone)]
pub struct Shop {
    /// Shop name
    pub name: String,

    donation_percentage: Percentage,

    /// Partner nonprofit receiving this shop's contributions, if chosen
    pub nonprofit: Option<NonprofitKey>,

    eco_profile: EcoProfile,
    eco_completeness: u8,
    eco_tier: EcoTier,

    /// When the shop was created
    pub created_at: DateTime<Utc>,
}

impl Shop {
    /// Creates a shop with an empty eco profile.
    ///
    /// `donation_percentage` is a fraction (0.05 = 5% of each subtotal).
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::DonationPercentOutOfRange`] if the fraction is
    /// outside 0–1.
    pub fn new(
        name: impl Into<String>,
        donation_percentage: Percentage,
        nonprofit: Option<NonprofitKey>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ShopError> {
        let fraction = donation_percentage * Decimal::ONE;

        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(ShopError::DonationPercentOutOfRange(fraction));
        }

        let profile = EcoProfile::default();
        let score = eco::score(&profile);

        Ok(Self {
            name: name.into(),
            donation_percentage,
            nonprofit,
            eco_profile: profile,
            eco_completeness: score.completeness,
            eco_tier: score.tier,
            created_at,
        })
    }

    /// Fraction of each order subtotal the shop contributes.
    #[must_use]
    pub fn donation_percentage(&self) -> Percentage {
        self.donation_percentage
    }

    /// Replace the eco profile and recompute the derived score fields.
    ///
    /// Idempotent: setting the same profile twice leaves the same
    /// completeness and tier.
    pub fn set_eco_profile(&mut self, profile: EcoProfile) {
        let score = eco::score(&profile);

        self.eco_profile = profile;
        self.eco_completeness = score.completeness;
        self.eco_tier = score.tier;
    }

    /// The declared eco profile.
    #[must_use]
    pub fn eco_profile(&self) -> &EcoProfile {
        &self.eco_profile
    }

    /// Persisted completeness percentage.
    #[must_use]
    pub fn eco_completeness(&self) -> u8 {
        self.eco_completeness
    }

    /// Persisted tier label.
    #[must_use]
    pub fn eco_tier(&self) -> EcoTier {
        self.eco_tier
    }
}

//! Eco profiles
//!
//! A shop declares a set of sustainability attributes; this module reduces
//! them to a completeness percentage and a tier label. Both are deterministic
//! functions of the declared attributes, so callers can recompute them on
//! every profile update and persist the result.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::Deserialize;

/// Number of recognised attributes: eight boolean flags plus two numeric
/// disclosures.
const RECOGNISED_ATTRIBUTES: u32 = 10;

/// Minimum completeness for the bronze tier.
pub const BRONZE_MIN: u8 = 25;

/// Minimum completeness for the silver tier.
pub const SILVER_MIN: u8 = 50;

/// Minimum completeness for the gold tier.
pub const GOLD_MIN: u8 = 75;

/// Declared sustainability attributes for a shop or product.
///
/// A flag counts towards completeness when `true`; a numeric disclosure
/// counts when present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EcoProfile {
    /// Products are made from organic materials.
    pub organic_materials: bool,

    /// Products are made from recycled materials.
    pub recycled_materials: bool,

    /// Orders ship in plastic-free packaging.
    pub plastic_free_packaging: bool,

    /// Shipping emissions are offset to carbon-neutral.
    pub carbon_neutral_shipping: bool,

    /// Production runs on renewable energy.
    pub renewable_energy: bool,

    /// Supply chain is fair-trade certified.
    pub fair_trade_certified: bool,

    /// Materials are sourced locally.
    pub locally_sourced: bool,

    /// Packaging is biodegradable.
    pub biodegradable_packaging: bool,

    /// Disclosed annual carbon emissions, in kilograms.
    pub carbon_emissions_kg: Option<Decimal>,

    /// Disclosed carbon offset, as a fraction (0.4 = 40% offset).
    pub carbon_offset: Option<Decimal>,
}

impl EcoProfile {
    /// Count of attributes that are set.
    fn filled_attributes(&self) -> u32 {
        let flags = [
            self.organic_materials,
            self.recycled_materials,
            self.plastic_free_packaging,
            self.carbon_neutral_shipping,
            self.renewable_energy,
            self.fair_trade_certified,
            self.locally_sourced,
            self.biodegradable_packaging,
        ];

        let flag_count = flags.iter().filter(|set| **set).count();
        let numeric_count = usize::from(self.carbon_emissions_kg.is_some())
            + usize::from(self.carbon_offset.is_some());

        u32::try_from(flag_count + numeric_count).unwrap_or(RECOGNISED_ATTRIBUTES)
    }
}

/// Completeness of a profile as an integer percentage (0–100).
///
/// Filled attributes over [`RECOGNISED_ATTRIBUTES`], rounded half-up so a
/// profile sitting exactly on a tier midpoint never falls to the lower tier.
pub fn completeness(profile: &EcoProfile) -> u8 {
    let filled = Decimal::from(profile.filled_attributes());
    let total = Decimal::from(RECOGNISED_ATTRIBUTES);

    let percent = (filled / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    percent.to_u8().unwrap_or(100).min(100)
}

/// Tier label derived from completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EcoTier {
    /// 0–24% complete
    Starter,

    /// 25–49% complete
    Bronze,

    /// 50–74% complete
    Silver,

    /// 75–100% complete
    Gold,
}

impl EcoTier {
    /// Step function over the tier breakpoints.
    ///
    /// A completeness exactly at a breakpoint gets the higher tier.
    #[must_use]
    pub fn from_completeness(completeness: u8) -> Self {
        match completeness {
            GOLD_MIN..=u8::MAX => EcoTier::Gold,
            SILVER_MIN..=74 => EcoTier::Silver,
            BRONZE_MIN..=49 => EcoTier::Bronze,
            _ => EcoTier::Starter,
        }
    }

    /// Lowercase label used for display and persistence.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            EcoTier::Starter => "starter",
            EcoTier::Bronze => "bronze",
            EcoTier::Silver => "silver",
            EcoTier::Gold => "gold",
        }
    }
}

impl fmt::Display for EcoTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The derived pair callers persist back onto the owning record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcoScore {
    /// Completeness percentage (0–100)
    pub completeness: u8,

    /// Tier derived from completeness
    pub tier: EcoTier,
}

/// Scores a profile: completeness plus tier in one pass.
pub fn score(profile: &EcoProfile) -> EcoScore {
    let completeness = completeness(profile);

    EcoScore {
        completeness,
        tier: EcoTier::from_completeness(completeness),
    }
}

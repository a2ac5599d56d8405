//! Donation splitting
//!
//! Splits an order subtotal into the up-to-three donation amounts the order
//! produces. The three amounts are independent and additive; each is
//! computed from the canonical subtotal, never by subtracting from a
//! pre-rounded total, so they can be summed across orders without drift.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::rates::PlatformRates;

/// Errors specific to donation splitting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    /// Shop donation percentage must be a fraction within 0–1 (0–100%).
    #[error("Shop donation percentage {0} is outside 0-100%")]
    DonationPercentOutOfRange(Decimal),

    /// Buyer direct donation must not be negative.
    #[error("Buyer direct donation {0} is negative")]
    NegativeBuyerDonation(Decimal),

    /// Buyer direct percentage must be a fraction within 0–1.
    #[error("Buyer direct percentage {0} is outside 0-100%")]
    BuyerPercentOutOfRange(Decimal),
}

/// The buyer's checkout opt-in for a direct donation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuyerDirectDonation {
    /// A fixed amount in major units (e.g. 2.00).
    Amount(Decimal),

    /// A buyer-chosen percentage of the order subtotal.
    PercentOfSubtotal(Percentage),
}

/// Donation amounts for one order, in exact major units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonationSplit {
    /// `subtotal * shop donation percentage`
    pub seller_contribution: Decimal,

    /// `subtotal * platform donation rate`
    pub platform_revenue: Decimal,

    /// The buyer's opt-in amount, if any
    pub buyer_direct: Option<Decimal>,
}

impl DonationSplit {
    /// Sum of all donation amounts produced by the order.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.seller_contribution + self.platform_revenue + self.buyer_direct.unwrap_or(Decimal::ZERO)
    }
}

/// Convert a money value to exact major units.
pub(crate) fn to_major_units(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}

/// Split an order subtotal into its donation amounts.
///
/// Rates are read once here and frozen into the returned amounts; later
/// changes to the shop's percentage or the platform rates never touch
/// historical orders.
///
/// # Errors
///
/// Returns a [`SplitError`] if the shop percentage or the buyer opt-in is
/// out of range.
pub fn split_order_donations(
    subtotal: &Money<'_, Currency>,
    shop_donation_percentage: Percentage,
    rates: &PlatformRates,
    buyer_direct: Option<BuyerDirectDonation>,
) -> Result<DonationSplit, SplitError> {
    let shop_fraction = shop_donation_percentage * Decimal::ONE;

    if shop_fraction < Decimal::ZERO || shop_fraction > Decimal::ONE {
        return Err(SplitError::DonationPercentOutOfRange(shop_fraction));
    }

    let subtotal_major = to_major_units(subtotal);

    let seller_contribution = shop_donation_percentage * subtotal_major;
    let platform_revenue = rates.donation_rate() * subtotal_major;

    let buyer_direct = match buyer_direct {
        None => None,
        Some(BuyerDirectDonation::Amount(amount)) => {
            if amount < Decimal::ZERO {
                return Err(SplitError::NegativeBuyerDonation(amount));
            }

            Some(amount)
        }
        Some(BuyerDirectDonation::PercentOfSubtotal(percent)) => {
            let fraction = percent * Decimal::ONE;

            if fraction < Decimal::ZERO || fraction > Decimal::ONE {
                return Err(SplitError::BuyerPercentOutOfRange(fraction));
            }

            Some(percent * subtotal_major)
        }
    };

    Ok(DonationSplit {
        seller_contribution,
        platform_revenue,
        buyer_direct,
    })
}

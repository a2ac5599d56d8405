//! Platform rates
//!
//! The platform fee on an order splits into a donation share and a net
//! revenue share. The three rates travel together so the invariant
//! `platform_fee_rate == donation_rate + net_revenue_rate` is checked once,
//! at construction, instead of trusted across call sites.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while validating rate configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateError {
    /// The platform fee does not equal the donation share plus the net
    /// revenue share.
    #[error("Platform fee {fee} does not equal donation {donation} + net revenue {net_revenue}")]
    FeeSplitMismatch {
        /// Configured platform fee as a fraction
        fee: Decimal,

        /// Configured donation share as a fraction
        donation: Decimal,

        /// Configured net revenue share as a fraction
        net_revenue: Decimal,
    },
}

/// Platform-wide rate configuration, read at order creation and frozen into
/// the produced records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformRates {
    donation_rate: Percentage,
    net_revenue_rate: Percentage,
    platform_fee_rate: Percentage,
}

impl PlatformRates {
    /// Creates a rate set, checking the fee split invariant.
    ///
    /// All rates are fractions (0.015 = 1.5%).
    ///
    /// # Errors
    ///
    /// Returns [`RateError::FeeSplitMismatch`] if the platform fee is not
    /// exactly the donation rate plus the net revenue rate.
    pub fn new(
        donation_rate: Percentage,
        net_revenue_rate: Percentage,
        platform_fee_rate: Percentage,
    ) -> Result<Self, RateError> {
        let donation = donation_rate * Decimal::ONE;
        let net_revenue = net_revenue_rate * Decimal::ONE;
        let fee = platform_fee_rate * Decimal::ONE;

        if donation + net_revenue != fee {
            return Err(RateError::FeeSplitMismatch {
                fee,
                donation,
                net_revenue,
            });
        }

        Ok(Self {
            donation_rate,
            net_revenue_rate,
            platform_fee_rate,
        })
    }

    /// Share of each order donated by the platform (fraction of subtotal).
    #[must_use]
    pub fn donation_rate(&self) -> Percentage {
        self.donation_rate
    }

    /// Share of each order kept as net platform revenue.
    #[must_use]
    pub fn net_revenue_rate(&self) -> Percentage {
        self.net_revenue_rate
    }

    /// Total platform fee on each order.
    #[must_use]
    pub fn platform_fee_rate(&self) -> Percentage {
        self.platform_fee_rate
    }
}

impl Default for PlatformRates {
    /// The launch configuration: 1.5% donated, 5.0% net revenue, 6.5% fee.
    fn default() -> Self {
        Self {
            donation_rate: Percentage::from(Decimal::new(15, 3)),
            net_revenue_rate: Percentage::from(Decimal::new(50, 3)),
            platform_fee_rate: Percentage::from(Decimal::new(65, 3)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rates_satisfy_the_split_invariant() {
        let rates = PlatformRates::default();

        let rebuilt = PlatformRates::new(
            rates.donation_rate(),
            rates.net_revenue_rate(),
            rates.platform_fee_rate(),
        );

        assert_eq!(rebuilt, Ok(rates));
    }

    #[test]
    fn mismatched_split_is_rejected() {
        let result = PlatformRates::new(
            Percentage::from(Decimal::new(15, 3)),
            Percentage::from(Decimal::new(50, 3)),
            Percentage::from(Decimal::new(70, 3)),
        );

        assert!(matches!(result, Err(RateError::FeeSplitMismatch { .. })));
    }

    #[test]
    fn custom_consistent_split_is_accepted() {
        let result = PlatformRates::new(
            Percentage::from(Decimal::new(2, 2)),
            Percentage::from(Decimal::new(4, 2)),
            Percentage::from(Decimal::new(6, 2)),
        );

        assert!(result.is_ok());
    }
}

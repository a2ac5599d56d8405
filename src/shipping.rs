//! Shipping quotes
//!
//! Pure cost estimation from cart contents and a destination country. This
//! module never purchases labels or talks to a carrier; callers present the
//! returned rate options and pass the chosen cost into checkout.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::cart::{Cart, CartError};

/// Errors that can occur while quoting shipping.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// Invalid cart input (zero quantity, negative price, currency mismatch).
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Shipping method for a rate option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingMethod {
    /// Tracked standard delivery.
    Standard,

    /// Expedited delivery.
    Express,

    /// Free standard delivery (subtotal threshold met).
    Free,
}

impl ShippingMethod {
    /// Display label for the method.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "Standard",
            ShippingMethod::Express => "Express",
            ShippingMethod::Free => "Free",
        }
    }
}

/// A single shipping choice offered to the buyer.
#[derive(Debug, Clone, PartialEq)]
pub struct RateOption<'a> {
    /// Shipping method
    pub method: ShippingMethod,

    /// Display label
    pub label: &'static str,

    /// Cost of this option
    pub cost: Money<'a, Currency>,

    /// Estimated delivery window in days (min, max)
    pub estimated_days: (u8, u8),

    /// Human-readable description
    pub description: String,
}

/// Result of quoting a cart: the selected cost plus every available option.
#[derive(Debug)]
pub struct ShippingQuote<'a> {
    /// Cost of the default (cheapest standard) option
    pub shipping_cost: Money<'a, Currency>,

    /// All available rate options, cheapest first
    pub available_rates: SmallVec<[RateOption<'a>; 3]>,
}

/// Rate configuration for a shop or the platform.
#[derive(Debug, Clone)]
pub struct ShippingConfig<'a> {
    domestic_country: &'static str,
    domestic_base: Money<'a, Currency>,
    international_base: Money<'a, Currency>,
    additional_item: Money<'a, Currency>,
    express_surcharge: Money<'a, Currency>,
    free_shipping_threshold: Option<Money<'a, Currency>>,
    standard_days: (u8, u8),
    express_days: (u8, u8),
    international_extra_days: u8,
}

impl<'a> ShippingConfig<'a> {
    /// Creates a config with the given base rates.
    ///
    /// `domestic_country` is an ISO 3166 alpha-2 code (e.g. `"US"`); any
    /// other destination, known or not, falls into the international tier.
    #[must_use]
    pub fn new(
        domestic_country: &'static str,
        domestic_base: Money<'a, Currency>,
        international_base: Money<'a, Currency>,
        additional_item: Money<'a, Currency>,
        express_surcharge: Money<'a, Currency>,
    ) -> Self {
        Self {
            domestic_country,
            domestic_base,
            international_base,
            additional_item,
            express_surcharge,
            free_shipping_threshold: None,
            standard_days: (3, 7),
            express_days: (1, 3),
            international_extra_days: 7,
        }
    }

    /// Enables free standard shipping at and above the given subtotal.
    #[must_use]
    pub fn with_free_shipping_threshold(mut self, threshold: Money<'a, Currency>) -> Self {
        self.free_shipping_threshold = Some(threshold);
        self
    }

    /// Overrides the estimated delivery windows.
    #[must_use]
    pub fn with_delivery_windows(
        mut self,
        standard_days: (u8, u8),
        express_days: (u8, u8),
        international_extra_days: u8,
    ) -> Self {
        self.standard_days = standard_days;
        self.express_days = express_days;
        self.international_extra_days = international_extra_days;
        self
    }

    /// Whether the destination is in the domestic tier.
    ///
    /// `None` means domestic (default destination).
    fn is_domestic(&self, destination_country: Option<&str>) -> bool {
        destination_country.is_none_or(|code| code.eq_ignore_ascii_case(self.domestic_country))
    }
}

/// Quote shipping for a cart.
///
/// Deterministic and free of I/O. An empty cart costs nothing and offers no
/// rate options. Otherwise the cost is the tier base rate plus a
/// per-additional-item increment for every item beyond the first; when the
/// free-shipping threshold is configured and the subtotal meets it, the
/// selected cost is zero and a free option is listed ahead of the paid ones.
///
/// # Errors
///
/// Returns a [`ShippingError::Cart`] if money arithmetic on the cart fails.
pub fn calculate_cart_shipping<'a>(
    config: &ShippingConfig<'a>,
    cart: &Cart<'a>,
    destination_country: Option<&str>,
) -> Result<ShippingQuote<'a>, ShippingError> {
    let currency = cart.currency();

    if cart.is_empty() {
        return Ok(ShippingQuote {
            shipping_cost: Money::from_minor(0, currency),
            available_rates: SmallVec::new(),
        });
    }

    let domestic = config.is_domestic(destination_country);

    let base = if domestic {
        &config.domestic_base
    } else {
        &config.international_base
    };

    let extra_items = i64::from(cart.total_quantity().saturating_sub(1));
    let standard_minor = base.to_minor_units() + config.additional_item.to_minor_units() * extra_items;
    let express_minor = standard_minor + config.express_surcharge.to_minor_units();

    let standard_days = delivery_window(config.standard_days, domestic, config.international_extra_days);
    let express_days = delivery_window(config.express_days, domestic, config.international_extra_days);

    let subtotal = cart.subtotal()?;

    let free_shipping = config
        .free_shipping_threshold
        .as_ref()
        .is_some_and(|threshold| subtotal.to_minor_units() >= threshold.to_minor_units());

    let mut available_rates: SmallVec<[RateOption<'a>; 3]> = SmallVec::new();

    if free_shipping {
        available_rates.push(RateOption {
            method: ShippingMethod::Free,
            label: ShippingMethod::Free.label(),
            cost: Money::from_minor(0, currency),
            estimated_days: standard_days,
            description: "Free standard shipping (order qualifies)".to_string(),
        });
    }

    available_rates.push(RateOption {
        method: ShippingMethod::Standard,
        label: ShippingMethod::Standard.label(),
        cost: Money::from_minor(standard_minor, currency),
        estimated_days: standard_days,
        description: format!(
            "Tracked delivery in {}-{} business days",
            standard_days.0, standard_days.1
        ),
    });

    available_rates.push(RateOption {
        method: ShippingMethod::Express,
        label: ShippingMethod::Express.label(),
        cost: Money::from_minor(express_minor, currency),
        estimated_days: express_days,
        description: format!(
            "Expedited delivery in {}-{} business days",
            express_days.0, express_days.1
        ),
    });

    let selected_minor = if free_shipping { 0 } else { standard_minor };

    Ok(ShippingQuote {
        shipping_cost: Money::from_minor(selected_minor, currency),
        available_rates,
    })
}

/// Widen a delivery window for international destinations.
fn delivery_window(days: (u8, u8), domestic: bool, international_extra: u8) -> (u8, u8) {
    if domestic {
        days
    } else {
        (
            days.0.saturating_add(international_extra),
            days.1.saturating_add(international_extra),
        )
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::cart::CartLineItem;

    use super::*;

    fn config<'a>() -> ShippingConfig<'a> {
        ShippingConfig::new(
            "US",
            Money::from_minor(499, USD),
            Money::from_minor(1499, USD),
            Money::from_minor(150, USD),
            Money::from_minor(700, USD),
        )
    }

    fn cart_of(quantity: u32) -> Result<Cart<'static>, CartError> {
        Cart::with_items(
            [CartLineItem::new(Money::from_minor(1000, USD), quantity)],
            USD,
        )
    }

    #[test]
    fn empty_cart_costs_nothing_and_offers_no_rates() -> TestResult {
        let cart = Cart::new(USD);
        let quote = calculate_cart_shipping(&config(), &cart, None)?;

        assert_eq!(quote.shipping_cost, Money::from_minor(0, USD));
        assert!(quote.available_rates.is_empty());

        Ok(())
    }

    #[test]
    fn single_item_pays_base_rate() -> TestResult {
        let cart = cart_of(1)?;
        let quote = calculate_cart_shipping(&config(), &cart, None)?;

        assert_eq!(quote.shipping_cost, Money::from_minor(499, USD));

        Ok(())
    }

    #[test]
    fn additional_items_add_increment() -> TestResult {
        let cart = cart_of(3)?;
        let quote = calculate_cart_shipping(&config(), &cart, None)?;

        // 499 + 150 * 2
        assert_eq!(quote.shipping_cost, Money::from_minor(799, USD));

        Ok(())
    }

    #[test]
    fn cost_is_monotone_in_quantity() -> TestResult {
        let mut previous = 0;

        for quantity in 1..=10 {
            let cart = cart_of(quantity)?;
            let quote = calculate_cart_shipping(&config(), &cart, None)?;
            let cost = quote.shipping_cost.to_minor_units();

            assert!(
                cost >= previous,
                "cost fell from {previous} to {cost} at quantity {quantity}"
            );
            previous = cost;
        }

        Ok(())
    }

    #[test]
    fn unknown_destination_uses_international_tier() -> TestResult {
        let cart = cart_of(1)?;

        let international = calculate_cart_shipping(&config(), &cart, Some("FR"))?;
        let unknown = calculate_cart_shipping(&config(), &cart, Some("ZZ"))?;

        assert_eq!(international.shipping_cost, Money::from_minor(1499, USD));
        assert_eq!(unknown.shipping_cost, Money::from_minor(1499, USD));

        Ok(())
    }

    #[test]
    fn domestic_destination_matches_default() -> TestResult {
        let cart = cart_of(2)?;

        let default = calculate_cart_shipping(&config(), &cart, None)?;
        let explicit = calculate_cart_shipping(&config(), &cart, Some("us"))?;

        assert_eq!(default.shipping_cost, explicit.shipping_cost);

        Ok(())
    }

    #[test]
    fn free_shipping_applies_at_threshold() -> TestResult {
        let config = config().with_free_shipping_threshold(Money::from_minor(2000, USD));

        // Subtotal exactly at the threshold qualifies.
        let cart = cart_of(2)?;
        let quote = calculate_cart_shipping(&config, &cart, None)?;

        assert_eq!(quote.shipping_cost, Money::from_minor(0, USD));
        assert_eq!(quote.available_rates.len(), 3);

        let Some(first) = quote.available_rates.first() else {
            panic!("expected a free rate option");
        };

        assert_eq!(first.method, ShippingMethod::Free);
        assert_eq!(first.cost, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn below_threshold_still_pays() -> TestResult {
        let config = config().with_free_shipping_threshold(Money::from_minor(2000, USD));

        let cart = cart_of(1)?;
        let quote = calculate_cart_shipping(&config, &cart, None)?;

        assert_eq!(quote.shipping_cost, Money::from_minor(499, USD));
        assert_eq!(quote.available_rates.len(), 2);

        Ok(())
    }

    #[test]
    fn express_option_costs_more_than_standard() -> TestResult {
        let cart = cart_of(1)?;
        let quote = calculate_cart_shipping(&config(), &cart, None)?;

        let standard = quote
            .available_rates
            .iter()
            .find(|rate| rate.method == ShippingMethod::Standard)
            .map(|rate| rate.cost.to_minor_units());

        let express = quote
            .available_rates
            .iter()
            .find(|rate| rate.method == ShippingMethod::Express)
            .map(|rate| rate.cost.to_minor_units());

        assert_eq!(standard, Some(499));
        assert_eq!(express, Some(1199));

        Ok(())
    }

    #[test]
    fn international_windows_are_wider() -> TestResult {
        let cart = cart_of(1)?;
        let quote = calculate_cart_shipping(&config(), &cart, Some("JP"))?;

        let Some(standard) = quote
            .available_rates
            .iter()
            .find(|rate| rate.method == ShippingMethod::Standard)
        else {
            panic!("expected a standard rate option");
        };

        assert_eq!(standard.estimated_days, (10, 14));

        Ok(())
    }
}

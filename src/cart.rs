//! Carts

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors related to cart construction or totals.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line item had quantity zero (line index).
    #[error("Line {0} has quantity 0; quantities must be at least 1")]
    ZeroQuantity(usize),

    /// A line item carried a negative price (line index).
    #[error("Line {0} has a negative price")]
    NegativePrice(usize),

    /// A line item's currency differs from the cart currency
    /// (line index, item currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A single client-supplied cart line: unit price, quantity, optional weight.
///
/// Ephemeral input to shipping and checkout; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem<'a> {
    price: Money<'a, Currency>,
    quantity: u32,
    weight_grams: Option<u32>,
}

impl<'a> CartLineItem<'a> {
    /// Creates a line item with the given unit price and quantity.
    #[must_use]
    pub fn new(price: Money<'a, Currency>, quantity: u32) -> Self {
        Self {
            price,
            quantity,
            weight_grams: None,
        }
    }

    /// Creates a line item with a declared shipping weight.
    #[must_use]
    pub fn with_weight(price: Money<'a, Currency>, quantity: u32, weight_grams: u32) -> Self {
        Self {
            price,
            quantity,
            weight_grams: Some(weight_grams),
        }
    }

    /// Unit price of the line.
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Quantity ordered.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Declared shipping weight, if any.
    pub fn weight_grams(&self) -> Option<u32> {
        self.weight_grams
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money<'a, Currency> {
        let minor = self.price.to_minor_units() * i64::from(self.quantity);

        Money::from_minor(minor, self.price.currency())
    }
}

/// A validated cart: every line has quantity ≥ 1, a non-negative price, and
/// the cart's currency.
#[derive(Debug)]
pub struct Cart<'a> {
    items: Vec<CartLineItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new, empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a cart from the given lines, validating each one.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] naming the first offending line if any line
    /// has quantity zero, a negative price, or a mismatched currency.
    pub fn with_items(
        items: impl Into<Vec<CartLineItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, line)| {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(i));
            }

            if line.price.to_minor_units() < 0 {
                return Err(CartError::NegativePrice(i));
            }

            let line_currency = line.price.currency();

            if line_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    i,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Cart { items, currency })
    }

    /// Calculate the subtotal of the cart.
    ///
    /// An empty cart has a zero subtotal in the cart's currency.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Money`] if money arithmetic fails.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        self.items.iter().try_fold(
            Money::from_minor(0, self.currency),
            |acc, line| acc.add(line.line_total()).map_err(CartError::Money),
        )
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(CartLineItem::quantity).sum()
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem<'a>> {
        self.items.iter()
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn with_items_accepts_valid_lines() -> TestResult {
        let cart = Cart::with_items(
            [
                CartLineItem::new(Money::from_minor(1250, USD), 2),
                CartLineItem::new(Money::from_minor(500, USD), 1),
            ],
            USD,
        )?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_quantity(), 3);

        Ok(())
    }

    #[test]
    fn with_items_rejects_zero_quantity() {
        let result = Cart::with_items([CartLineItem::new(Money::from_minor(100, USD), 0)], USD);

        assert!(matches!(result, Err(CartError::ZeroQuantity(0))));
    }

    #[test]
    fn with_items_rejects_negative_price() {
        let result = Cart::with_items([CartLineItem::new(Money::from_minor(-100, USD), 1)], USD);

        assert!(matches!(result, Err(CartError::NegativePrice(0))));
    }

    #[test]
    fn with_items_rejects_currency_mismatch() {
        let result = Cart::with_items(
            [
                CartLineItem::new(Money::from_minor(100, USD), 1),
                CartLineItem::new(Money::from_minor(100, GBP), 1),
            ],
            USD,
        );

        match result {
            Err(CartError::CurrencyMismatch(idx, line_currency, cart_currency)) => {
                assert_eq!(idx, 1);
                assert_eq!(line_currency, GBP.iso_alpha_code);
                assert_eq!(cart_currency, USD.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn subtotal_multiplies_quantities() -> TestResult {
        let cart = Cart::with_items(
            [
                CartLineItem::new(Money::from_minor(1250, USD), 2),
                CartLineItem::new(Money::from_minor(500, USD), 1),
            ],
            USD,
        )?;

        assert_eq!(cart.subtotal()?, Money::from_minor(3000, USD));

        Ok(())
    }

    #[test]
    fn empty_cart_has_zero_subtotal() -> TestResult {
        let cart = Cart::new(USD);

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal()?, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn line_total_is_price_times_quantity() {
        let line = CartLineItem::with_weight(Money::from_minor(399, GBP), 3, 250);

        assert_eq!(line.line_total(), Money::from_minor(1197, GBP));
        assert_eq!(line.weight_grams(), Some(250));
    }
}

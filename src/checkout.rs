//! Checkout assembly
//!
//! Builds an order and its donation rows in one call so the caller can
//! persist them in a single transaction; a donation row must never exist
//! without its parent order. Amounts are computed here once and frozen.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rusty_money::MoneyError;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    buyers::BuyerKey,
    cart::{Cart, CartError},
    donations::{
        Donation, DonorType,
        split::{BuyerDirectDonation, SplitError, split_order_donations},
    },
    nonprofits::NonprofitKey,
    orders::{Order, OrderId, OrderItem},
    rates::PlatformRates,
    shipping::ShippingQuote,
    shops::{Shop, ShopKey},
};

/// Errors that can occur while assembling an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Invalid cart input.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Invalid donation configuration or opt-in.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The cart has no lines; an order must purchase something.
    #[error("Cannot place an order for an empty cart")]
    EmptyCart,
}

/// Checkout parameters for one order.
#[derive(Debug)]
pub struct CheckoutInput<'a, 'c> {
    /// Order id assigned by the persistence layer
    pub id: OrderId,

    /// Purchasing buyer
    pub buyer: BuyerKey,

    /// Selling shop
    pub shop: ShopKey,

    /// Validated cart contents
    pub cart: &'c Cart<'a>,

    /// Shipping quote selected for the order
    pub shipping: &'c ShippingQuote<'a>,

    /// The buyer's direct-donation opt-in, if any
    pub buyer_direct: Option<BuyerDirectDonation>,

    /// When the order was placed
    pub placed_at: DateTime<Utc>,
}

/// An order plus the donation rows it produced, to persist atomically.
#[derive(Debug)]
pub struct PlacedOrder<'a> {
    /// The order record
    pub order: Order<'a>,

    /// Donation rows (zero-amount rows are not produced)
    pub donations: SmallVec<[Donation; 3]>,
}

/// Assemble an order and its donation rows.
///
/// The shop's donation percentage and the platform rates are read here and
/// frozen into the produced records. Donations go to the shop's partner
/// nonprofit when one is configured, otherwise to `default_nonprofit`.
///
/// # Errors
///
/// Returns a [`CheckoutError`] for an empty cart, an out-of-range donation
/// configuration, or failed money arithmetic.
pub fn place_order<'a>(
    input: CheckoutInput<'a, '_>,
    shop: &Shop,
    rates: &PlatformRates,
    default_nonprofit: NonprofitKey,
) -> Result<PlacedOrder<'a>, CheckoutError> {
    if input.cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let subtotal = input.cart.subtotal()?;
    let total = subtotal.add(input.shipping.shipping_cost)?;

    let split = split_order_donations(
        &subtotal,
        shop.donation_percentage(),
        rates,
        input.buyer_direct,
    )?;

    let nonprofit = shop.nonprofit.unwrap_or(default_nonprofit);

    let mut donations: SmallVec<[Donation; 3]> = SmallVec::new();

    if split.seller_contribution > Decimal::ZERO {
        donations.push(
            Donation::new(
                split.seller_contribution,
                DonorType::SellerContribution,
                nonprofit,
                input.id,
                input.placed_at,
            )
            .from_shop(input.shop),
        );
    }

    if split.platform_revenue > Decimal::ZERO {
        donations.push(Donation::new(
            split.platform_revenue,
            DonorType::PlatformRevenue,
            nonprofit,
            input.id,
            input.placed_at,
        ));
    }

    if let Some(amount) = split.buyer_direct {
        if amount > Decimal::ZERO {
            donations.push(
                Donation::new(
                    amount,
                    DonorType::BuyerDirect,
                    nonprofit,
                    input.id,
                    input.placed_at,
                )
                .from_buyer(input.buyer),
            );
        }
    }

    let items = input
        .cart
        .iter()
        .map(|line| OrderItem::new(*line.price(), line.quantity()))
        .collect();

    let order = Order::new(
        input.id,
        input.buyer,
        input.shop,
        items,
        subtotal,
        input.shipping.shipping_cost,
        total,
        split.total(),
        input.placed_at,
    );

    Ok(PlacedOrder { order, donations })
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::USD};
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::{
        cart::CartLineItem,
        shipping::{ShippingConfig, calculate_cart_shipping},
    };

    use super::*;

    fn keys() -> (BuyerKey, ShopKey, NonprofitKey) {
        let mut buyers = SlotMap::<BuyerKey, ()>::with_key();
        let mut shops = SlotMap::<ShopKey, ()>::with_key();
        let mut nonprofits = SlotMap::<NonprofitKey, ()>::with_key();

        (buyers.insert(()), shops.insert(()), nonprofits.insert(()))
    }

    fn shipping_config<'a>() -> ShippingConfig<'a> {
        ShippingConfig::new(
            "US",
            Money::from_minor(499, USD),
            Money::from_minor(1499, USD),
            Money::from_minor(150, USD),
            Money::from_minor(700, USD),
        )
    }

    #[test]
    fn order_total_adds_shipping_and_freezes_donations() -> TestResult {
        let (buyer, shop_key, nonprofit) = keys();

        let shop = Shop::new(
            "Driftwood Goods",
            Percentage::from(Decimal::new(10, 2)),
            None,
            chrono::Utc::now(),
        )?;

        let cart = Cart::with_items(
            [CartLineItem::new(Money::from_minor(5000, USD), 1)],
            USD,
        )?;

        let quote = calculate_cart_shipping(&shipping_config(), &cart, None)?;

        let placed = place_order(
            CheckoutInput {
                id: OrderId(1),
                buyer,
                shop: shop_key,
                cart: &cart,
                shipping: &quote,
                buyer_direct: Some(BuyerDirectDonation::Amount(Decimal::new(200, 2))),
                placed_at: chrono::Utc::now(),
            },
            &shop,
            &PlatformRates::default(),
            nonprofit,
        )?;

        assert_eq!(placed.order.subtotal(), &Money::from_minor(5000, USD));
        assert_eq!(placed.order.shipping_cost(), &Money::from_minor(499, USD));
        assert_eq!(placed.order.total(), &Money::from_minor(5499, USD));

        // $5.00 seller + $0.75 platform + $2.00 buyer
        assert_eq!(placed.donations.len(), 3);
        assert_eq!(placed.order.nonprofit_donation(), Decimal::new(775, 2));

        Ok(())
    }

    #[test]
    fn zero_amount_rows_are_not_produced() -> TestResult {
        let (buyer, shop_key, nonprofit) = keys();

        let shop = Shop::new(
            "No-Donation Shop",
            Percentage::from(Decimal::ZERO),
            None,
            chrono::Utc::now(),
        )?;

        let cart = Cart::with_items(
            [CartLineItem::new(Money::from_minor(1000, USD), 1)],
            USD,
        )?;

        let quote = calculate_cart_shipping(&shipping_config(), &cart, None)?;

        let placed = place_order(
            CheckoutInput {
                id: OrderId(2),
                buyer,
                shop: shop_key,
                cart: &cart,
                shipping: &quote,
                buyer_direct: None,
                placed_at: chrono::Utc::now(),
            },
            &shop,
            &PlatformRates::default(),
            nonprofit,
        )?;

        // Only the platform-revenue row remains.
        assert_eq!(placed.donations.len(), 1);

        let Some(row) = placed.donations.first() else {
            panic!("expected one donation row");
        };

        assert_eq!(row.donor_type(), DonorType::PlatformRevenue);

        Ok(())
    }

    #[test]
    fn empty_cart_cannot_be_checked_out() -> TestResult {
        let (buyer, shop_key, nonprofit) = keys();

        let shop = Shop::new(
            "Driftwood Goods",
            Percentage::from(Decimal::new(5, 2)),
            None,
            chrono::Utc::now(),
        )?;

        let cart = Cart::new(USD);
        let quote = calculate_cart_shipping(&shipping_config(), &cart, None)?;

        let result = place_order(
            CheckoutInput {
                id: OrderId(3),
                buyer,
                shop: shop_key,
                cart: &cart,
                shipping: &quote,
                buyer_direct: None,
                placed_at: chrono::Utc::now(),
            },
            &shop,
            &PlatformRates::default(),
            nonprofit,
        );

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[test]
    fn shop_nonprofit_takes_precedence_over_default() -> TestResult {
        let (buyer, shop_key, default_nonprofit) = keys();

        let mut nonprofits = SlotMap::<NonprofitKey, ()>::with_key();
        let partner = nonprofits.insert(());

        let shop = Shop::new(
            "Partnered Shop",
            Percentage::from(Decimal::new(5, 2)),
            Some(partner),
            chrono::Utc::now(),
        )?;

        let cart = Cart::with_items(
            [CartLineItem::new(Money::from_minor(1000, USD), 1)],
            USD,
        )?;

        let quote = calculate_cart_shipping(&shipping_config(), &cart, None)?;

        let placed = place_order(
            CheckoutInput {
                id: OrderId(4),
                buyer,
                shop: shop_key,
                cart: &cart,
                shipping: &quote,
                buyer_direct: None,
                placed_at: chrono::Utc::now(),
            },
            &shop,
            &PlatformRates::default(),
            default_nonprofit,
        )?;

        assert!(
            placed
                .donations
                .iter()
                .all(|donation| donation.nonprofit() == partner),
            "all rows should target the shop's partner nonprofit"
        );

        Ok(())
    }
}

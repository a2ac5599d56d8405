//! Fixtures
//!
//! YAML-defined marketplace snapshots (nonprofits, shops, buyers, orders
//! with their donation rows) loaded into an in-memory [`Ledger`] for the
//! demo binary and integration tests.

use std::{fs, path::PathBuf};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

use crate::{
    buyers::{Buyer, BuyerKey},
    checkout::PlacedOrder,
    donations::{Donation, DonorType},
    impact::Ledger,
    nonprofits::{Nonprofit, NonprofitKey},
    orders::{Order, OrderError, OrderId, OrderItem, OrderStatus},
    shops::{Shop, ShopError, ShopKey},
};

pub mod ledger;

use ledger::{DonationFixture, LedgerFixture, OrderFixture};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between the ledger and a price
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Shop not found
    #[error("Shop not found: {0}")]
    ShopNotFound(String),

    /// Buyer not found
    #[error("Buyer not found: {0}")]
    BuyerNotFound(String),

    /// Nonprofit not found
    #[error("Nonprofit not found: {0}")]
    NonprofitNotFound(String),

    /// A donation has no nonprofit and its shop has no partner
    #[error("Order {0} has a donation with no nonprofit to receive it")]
    MissingNonprofit(u64),

    /// Invalid shop configuration
    #[error(transparent)]
    Shop(#[from] ShopError),

    /// Invalid order lifecycle in the fixture
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Loads YAML ledger fixtures from a base directory.
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a fixture loader with the default base path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture loader with a custom base path.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a named ledger from `<base>/ledgers/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// string reference inside it does not resolve.
    pub fn load_ledger(&self, name: &str) -> Result<Ledger<'static>, FixtureError> {
        let file_path = self.base_path.join("ledgers").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: LedgerFixture = serde_norway::from_str(&contents)?;

        build_ledger(&fixture)
    }

    /// Load a named ledger from the default base path.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be loaded.
    pub fn from_set(name: &str) -> Result<Ledger<'static>, FixtureError> {
        Self::new().load_ledger(name)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse price string (e.g., "2.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed, or if the currency code is not
/// recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = currency_from_code(currency_code)?;

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / Decimal::ONE_HUNDRED))
    } else {
        let value = trimmed
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}

fn currency_from_code(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

fn build_ledger(fixture: &LedgerFixture) -> Result<Ledger<'static>, FixtureError> {
    let currency = currency_from_code(&fixture.currency)?;

    let mut ledger = Ledger::new();

    let mut nonprofit_keys: FxHashMap<&str, NonprofitKey> = FxHashMap::default();
    let mut shop_keys: FxHashMap<&str, ShopKey> = FxHashMap::default();
    let mut buyer_keys: FxHashMap<&str, BuyerKey> = FxHashMap::default();

    for (id, nonprofit) in &fixture.nonprofits {
        let mut record = Nonprofit::new(&nonprofit.name, &nonprofit.mission, &nonprofit.ein)
            .with_categories(nonprofit.categories.clone());
        record.is_verified = nonprofit.verified;

        nonprofit_keys.insert(id.as_str(), ledger.add_nonprofit(record));
    }

    for (id, shop) in &fixture.shops {
        let nonprofit = shop
            .nonprofit
            .as_deref()
            .map(|name| {
                nonprofit_keys
                    .get(name)
                    .copied()
                    .ok_or_else(|| FixtureError::NonprofitNotFound(name.to_string()))
            })
            .transpose()?;

        let mut record = Shop::new(
            &shop.name,
            parse_percentage(&shop.donation_percentage)?,
            nonprofit,
            shop.created_at,
        )?;

        record.set_eco_profile(shop.eco_profile.clone());

        shop_keys.insert(id.as_str(), ledger.add_shop(record));
    }

    for (id, buyer) in &fixture.buyers {
        let key = ledger.add_buyer(Buyer::new(&buyer.name, buyer.signed_up_at));
        buyer_keys.insert(id.as_str(), key);
    }

    for order in &fixture.orders {
        let placed = build_order(order, currency, &shop_keys, &buyer_keys, &nonprofit_keys, &ledger)?;

        ledger.record(placed);
    }

    Ok(ledger)
}

fn build_order(
    fixture: &OrderFixture,
    currency: &'static Currency,
    shop_keys: &FxHashMap<&str, ShopKey>,
    buyer_keys: &FxHashMap<&str, BuyerKey>,
    nonprofit_keys: &FxHashMap<&str, NonprofitKey>,
    ledger: &Ledger<'static>,
) -> Result<PlacedOrder<'static>, FixtureError> {
    let shop = shop_keys
        .get(fixture.shop.as_str())
        .copied()
        .ok_or_else(|| FixtureError::ShopNotFound(fixture.shop.clone()))?;

    let buyer = buyer_keys
        .get(fixture.buyer.as_str())
        .copied()
        .ok_or_else(|| FixtureError::BuyerNotFound(fixture.buyer.clone()))?;

    let mut items = Vec::with_capacity(fixture.items.len());
    let mut subtotal_minor = 0i64;

    for item in &fixture.items {
        let (minor, item_currency) = parse_price(&item.price)?;

        if item_currency != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                item_currency.iso_alpha_code.to_string(),
            ));
        }

        subtotal_minor += minor * i64::from(item.quantity);
        items.push(OrderItem::new(Money::from_minor(minor, currency), item.quantity));
    }

    let (shipping_minor, shipping_currency) = parse_price(&fixture.shipping)?;

    if shipping_currency != currency {
        return Err(FixtureError::CurrencyMismatch(
            currency.iso_alpha_code.to_string(),
            shipping_currency.iso_alpha_code.to_string(),
        ));
    }

    let donations = fixture
        .donations
        .iter()
        .map(|donation| build_donation(donation, fixture, shop, buyer, nonprofit_keys, ledger))
        .collect::<Result<Vec<Donation>, FixtureError>>()?;

    let donation_total: Decimal = donations.iter().map(Donation::amount).sum();

    let mut order = Order::new(
        OrderId(fixture.id),
        buyer,
        shop,
        items,
        Money::from_minor(subtotal_minor, currency),
        Money::from_minor(shipping_minor, currency),
        Money::from_minor(subtotal_minor + shipping_minor, currency),
        donation_total,
        fixture.created_at,
    );

    apply_status(&mut order, fixture.status.into())?;

    Ok(PlacedOrder {
        order,
        donations: donations.into_iter().collect(),
    })
}

fn build_donation(
    fixture: &DonationFixture,
    order: &OrderFixture,
    shop: ShopKey,
    buyer: BuyerKey,
    nonprofit_keys: &FxHashMap<&str, NonprofitKey>,
    ledger: &Ledger<'static>,
) -> Result<Donation, FixtureError> {
    let nonprofit = match fixture.nonprofit.as_deref() {
        Some(name) => nonprofit_keys
            .get(name)
            .copied()
            .ok_or_else(|| FixtureError::NonprofitNotFound(name.to_string()))?,
        None => ledger
            .shop(shop)
            .and_then(|record| record.nonprofit)
            .ok_or(FixtureError::MissingNonprofit(order.id))?,
    };

    let donor_type: DonorType = fixture.donor_type.into();
    let created_at = fixture.created_at.unwrap_or(order.created_at);

    let mut donation = Donation::new(
        fixture.amount,
        donor_type,
        nonprofit,
        OrderId(order.id),
        created_at,
    );

    donation = match donor_type {
        DonorType::SellerContribution => donation.from_shop(shop),
        DonorType::BuyerDirect => donation.from_buyer(buyer),
        DonorType::PlatformRevenue => donation,
    };

    if fixture.paid() {
        donation.mark_paid();
    }

    Ok(donation)
}

/// Walk an order through the lifecycle to the fixture's target status.
fn apply_status(order: &mut Order<'_>, target: OrderStatus) -> Result<(), OrderError> {
    let path: &[OrderStatus] = match target {
        OrderStatus::Pending => &[],
        OrderStatus::Processing => &[OrderStatus::Processing],
        OrderStatus::Shipped => &[OrderStatus::Processing, OrderStatus::Shipped],
        OrderStatus::Delivered => &[
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ],
        OrderStatus::Cancelled => &[OrderStatus::Cancelled],
    };

    for status in path {
        order.transition_to(*status)?;
    }

    Ok(())
}

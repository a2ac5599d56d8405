//! Ledger Fixtures

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    donations::DonorType,
    eco::EcoProfile,
    orders::OrderStatus,
};

/// Top-level ledger fixture file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerFixture {
    /// ISO currency code for every price in the file
    pub currency: String,

    /// Map of nonprofit id -> nonprofit fixture
    #[serde(default)]
    pub nonprofits: FxHashMap<String, NonprofitFixture>,

    /// Map of shop id -> shop fixture
    #[serde(default)]
    pub shops: FxHashMap<String, ShopFixture>,

    /// Map of buyer id -> buyer fixture
    #[serde(default)]
    pub buyers: FxHashMap<String, BuyerFixture>,

    /// Orders, each carrying its donation rows
    #[serde(default)]
    pub orders: Vec<OrderFixture>,
}

/// Nonprofit Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NonprofitFixture {
    /// Nonprofit name
    pub name: String,

    /// Mission statement
    pub mission: String,

    /// Employer identification number
    pub ein: String,

    /// Whether the platform has verified the nonprofit
    #[serde(default = "default_verified")]
    pub verified: bool,

    /// Cause categories
    #[serde(default)]
    pub categories: Vec<String>,
}

fn default_verified() -> bool {
    true
}

/// Shop Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShopFixture {
    /// Shop name
    pub name: String,

    /// Donation percentage (e.g., "10%" or "0.10")
    pub donation_percentage: String,

    /// Id of the shop's partner nonprofit, if any
    #[serde(default)]
    pub nonprofit: Option<String>,

    /// When the shop joined the platform
    pub created_at: DateTime<Utc>,

    /// Declared sustainability attributes
    #[serde(default)]
    pub eco_profile: EcoProfile,
}

/// Buyer Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuyerFixture {
    /// Display name
    pub name: String,

    /// When the buyer signed up
    pub signed_up_at: DateTime<Utc>,
}

/// Order Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderFixture {
    /// Order id, unique within the file
    pub id: u64,

    /// Id of the purchasing buyer
    pub buyer: String,

    /// Id of the selling shop
    pub shop: String,

    /// Target lifecycle status
    #[serde(default)]
    pub status: OrderStatusFixture,

    /// When the order was placed
    pub created_at: DateTime<Utc>,

    /// Shipping cost (e.g., "4.99 USD")
    pub shipping: String,

    /// Line items
    pub items: Vec<OrderItemFixture>,

    /// Donation rows produced by the order
    #[serde(default)]
    pub donations: Vec<DonationFixture>,
}

/// Order Item Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderItemFixture {
    /// Unit price (e.g., "12.50 USD")
    pub price: String,

    /// Quantity
    pub quantity: u32,
}

/// Donation Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonationFixture {
    /// Source of the donation
    pub donor_type: DonorTypeFixture,

    /// Amount in major units (e.g., "5.00")
    pub amount: Decimal,

    /// Payment status
    #[serde(default)]
    pub status: DonationStatusFixture,

    /// Receiving nonprofit id; defaults to the shop's partner
    #[serde(default)]
    pub nonprofit: Option<String>,

    /// Recorded-at override; defaults to the order's timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl DonationFixture {
    /// Whether the fixture marks the donation as paid out.
    #[must_use]
    pub fn paid(&self) -> bool {
        self.status == DonationStatusFixture::Paid
    }
}

/// Donor type as written in YAML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonorTypeFixture {
    /// Buyer opt-in at checkout
    BuyerDirect,

    /// Shop's configured contribution
    SellerContribution,

    /// Platform's share of its fee
    PlatformRevenue,
}

impl From<DonorTypeFixture> for DonorType {
    fn from(fixture: DonorTypeFixture) -> Self {
        match fixture {
            DonorTypeFixture::BuyerDirect => DonorType::BuyerDirect,
            DonorTypeFixture::SellerContribution => DonorType::SellerContribution,
            DonorTypeFixture::PlatformRevenue => DonorType::PlatformRevenue,
        }
    }
}

/// Donation payment status as written in YAML
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatusFixture {
    /// Not yet paid out
    #[default]
    Pending,

    /// Paid out
    Paid,
}

/// Order lifecycle status as written in YAML
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusFixture {
    /// Placed, not yet processed
    #[default]
    Pending,

    /// Being prepared
    Processing,

    /// Handed to the carrier
    Shipped,

    /// Received by the buyer
    Delivered,

    /// Cancelled before shipment
    Cancelled,
}

impl From<OrderStatusFixture> for OrderStatus {
    fn from(fixture: OrderStatusFixture) -> Self {
        match fixture {
            OrderStatusFixture::Pending => OrderStatus::Pending,
            OrderStatusFixture::Processing => OrderStatus::Processing,
            OrderStatusFixture::Shipped => OrderStatus::Shipped,
            OrderStatusFixture::Delivered => OrderStatus::Delivered,
            OrderStatusFixture::Cancelled => OrderStatus::Cancelled,
        }
    }
}

//! Donations
//!
//! A donation row earmarks money for a nonprofit. One order can produce up
//! to three rows, one per donor type; each row's amount is frozen at order
//! creation and its payment status moves to paid independently, on payout.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{buyers::BuyerKey, nonprofits::NonprofitKey, orders::OrderId, shops::ShopKey};

pub mod split;

/// Source of a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DonorType {
    /// The buyer opted in to a direct donation at checkout.
    BuyerDirect,

    /// The shop's configured contribution percentage.
    SellerContribution,

    /// The platform's share of its own fee.
    PlatformRevenue,
}

impl DonorType {
    /// Display label for the donor type.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            DonorType::BuyerDirect => "Buyer direct",
            DonorType::SellerContribution => "Seller contribution",
            DonorType::PlatformRevenue => "Platform revenue",
        }
    }
}

/// Payment status of a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationStatus {
    /// Recorded but not yet paid out to the nonprofit.
    Pending,

    /// Paid out.
    Paid,
}

/// A monetary record earmarked for a nonprofit.
///
/// The amount is an exact decimal in major units, computed independently
/// from the order's canonical subtotal. Keeping it exact (instead of
/// pre-rounding each row to cents) is what stops rounding drift when rows
/// are summed across many orders; [`Donation::amount_rounded`] gives the
/// 2-decimal presentation value.
#[derive(Debug, Clone)]
pub struct Donation {
    amount: Decimal,
    status: DonationStatus,
    donor_type: DonorType,
    nonprofit: NonprofitKey,
    shop: Option<ShopKey>,
    buyer: Option<BuyerKey>,
    order: OrderId,
    created_at: DateTime<Utc>,
}

impl Donation {
    /// Creates a pending donation.
    #[must_use]
    pub fn new(
        amount: Decimal,
        donor_type: DonorType,
        nonprofit: NonprofitKey,
        order: OrderId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            amount,
            status: DonationStatus::Pending,
            donor_type,
            nonprofit,
            shop: None,
            buyer: None,
            order,
            created_at,
        }
    }

    /// Attributes the donation to a shop.
    #[must_use]
    pub fn from_shop(mut self, shop: ShopKey) -> Self {
        self.shop = Some(shop);
        self
    }

    /// Attributes the donation to a buyer.
    #[must_use]
    pub fn from_buyer(mut self, buyer: BuyerKey) -> Self {
        self.buyer = Some(buyer);
        self
    }

    /// Exact amount in major units.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Amount rounded half-up to 2 decimal places, for display.
    #[must_use]
    pub fn amount_rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Payment status.
    #[must_use]
    pub fn status(&self) -> DonationStatus {
        self.status
    }

    /// Whether the donation has been paid out.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status == DonationStatus::Paid
    }

    /// Marks the donation as paid out.
    pub fn mark_paid(&mut self) {
        self.status = DonationStatus::Paid;
    }

    /// Source of the donation.
    #[must_use]
    pub fn donor_type(&self) -> DonorType {
        self.donor_type
    }

    /// Receiving nonprofit.
    #[must_use]
    pub fn nonprofit(&self) -> NonprofitKey {
        self.nonprofit
    }

    /// Contributing shop, if any.
    #[must_use]
    pub fn shop(&self) -> Option<ShopKey> {
        self.shop
    }

    /// Contributing buyer, if any.
    #[must_use]
    pub fn buyer(&self) -> Option<BuyerKey> {
        self.buyer
    }

    /// Parent order.
    #[must_use]
    pub fn order(&self) -> OrderId {
        self.order
    }

    /// When the donation was recorded.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

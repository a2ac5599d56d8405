//! Impact reporting
//!
//! Read-only reports over recorded orders and donations: per-buyer and
//! per-shop summaries, the admin-only platform summary, cohort retention and
//! revenue projection. Reports never mutate; they are safe to retry, and a
//! report generated moments after checkout may lag by one request cycle.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    buyers::{Buyer, BuyerKey},
    checkout::PlacedOrder,
    context::{AccessError, Identity},
    donations::{Donation, DonorType},
    nonprofits::{Nonprofit, NonprofitKey},
    orders::{Order, OrderStatus},
    shops::{Shop, ShopKey},
};

pub mod cohort;
pub mod forecast;
pub mod monthly;
pub mod render;

use monthly::{MonthlyBucket, TRAILING_MONTHS, fold_into_buckets, month_windows};

/// Errors returned by report functions.
///
/// The single failure contract of the reporting layer: authorization and
/// not-found failures are values, never panics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// The caller lacks the required role.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The scoping buyer does not exist.
    #[error("Buyer not found")]
    BuyerNotFound(BuyerKey),

    /// The scoping shop does not exist.
    #[error("Shop not found")]
    ShopNotFound(ShopKey),
}

/// Scope of an impact report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactScope {
    /// One buyer's direct donations.
    Buyer(BuyerKey),

    /// One shop's seller contributions.
    Shop(ShopKey),

    /// Everything, across all donor types. Admin only.
    Platform,
}

/// Per-nonprofit slice of a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonprofitBreakdown {
    /// Receiving nonprofit
    pub nonprofit: NonprofitKey,

    /// Nonprofit name (tie-break key for equal amounts)
    pub name: String,

    /// Exact total donated to this nonprofit within the scope
    pub total: Decimal,

    /// Number of donations
    pub count: usize,
}

/// A scoped donation summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationSummary {
    /// Scope the summary was computed for
    pub scope: ImpactScope,

    /// Exact total across all in-scope donations
    pub total_donated: Decimal,

    /// Exact total of paid-out donations
    pub paid: Decimal,

    /// Exact total of pending donations
    pub pending: Decimal,

    /// Number of in-scope donations
    pub donation_count: usize,

    /// Per-nonprofit breakdown, largest total first, names ascending on ties
    pub by_nonprofit: Vec<NonprofitBreakdown>,

    /// Trailing 12 calendar months, oldest first, quiet months included
    pub monthly: Vec<MonthlyBucket>,
}

impl DonationSummary {
    /// Total donated, rounded half-up to 2 decimal places for display.
    #[must_use]
    pub fn total_donated_rounded(&self) -> Decimal {
        self.total_donated
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// In-memory read model the reports fold over.
///
/// The production datastore presents the same shape; reports only ever read
/// from it.
#[derive(Debug, Default)]
pub struct Ledger<'a> {
    buyers: SlotMap<BuyerKey, Buyer>,
    shops: SlotMap<ShopKey, Shop>,
    nonprofits: SlotMap<NonprofitKey, Nonprofit>,
    orders: Vec<Order<'a>>,
    donations: Vec<Donation>,
}

impl<'a> Ledger<'a> {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a buyer and returns their key.
    pub fn add_buyer(&mut self, buyer: Buyer) -> BuyerKey {
        self.buyers.insert(buyer)
    }

    /// Registers a shop and returns its key.
    pub fn add_shop(&mut self, shop: Shop) -> ShopKey {
        self.shops.insert(shop)
    }

    /// Registers a nonprofit and returns its key.
    pub fn add_nonprofit(&mut self, nonprofit: Nonprofit) -> NonprofitKey {
        self.nonprofits.insert(nonprofit)
    }

    /// Records a placed order and its donation rows together.
    ///
    /// Mirrors the single-transaction write at checkout: a donation row is
    /// never recorded without its parent order.
    pub fn record(&mut self, placed: PlacedOrder<'a>) {
        self.orders.push(placed.order);
        self.donations.extend(placed.donations);
    }

    /// Look up a buyer.
    #[must_use]
    pub fn buyer(&self, key: BuyerKey) -> Option<&Buyer> {
        self.buyers.get(key)
    }

    /// Look up a shop.
    #[must_use]
    pub fn shop(&self, key: ShopKey) -> Option<&Shop> {
        self.shops.get(key)
    }

    /// Look up a shop mutably (profile updates).
    pub fn shop_mut(&mut self, key: ShopKey) -> Option<&mut Shop> {
        self.shops.get_mut(key)
    }

    /// Look up a nonprofit.
    #[must_use]
    pub fn nonprofit(&self, key: NonprofitKey) -> Option<&Nonprofit> {
        self.nonprofits.get(key)
    }

    /// All registered buyers.
    pub fn buyers(&self) -> impl Iterator<Item = (BuyerKey, &Buyer)> {
        self.buyers.iter()
    }

    /// All recorded orders.
    #[must_use]
    pub fn orders(&self) -> &[Order<'a>] {
        &self.orders
    }

    /// All recorded donations.
    #[must_use]
    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    /// Look up a donation's row mutably (payout processing).
    pub fn donations_mut(&mut self) -> &mut [Donation] {
        &mut self.donations
    }

    /// A buyer's impact summary: their direct donations only.
    ///
    /// Callable by that buyer or an admin.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Access`] if the caller is not the buyer or an
    /// admin, or [`ReportError::BuyerNotFound`] if the buyer does not exist.
    pub fn buyer_summary(
        &self,
        identity: &Identity,
        buyer: BuyerKey,
        now: DateTime<Utc>,
    ) -> Result<DonationSummary, ReportError> {
        identity.require_buyer(buyer)?;

        if !self.buyers.contains_key(buyer) {
            return Err(ReportError::BuyerNotFound(buyer));
        }

        let in_scope: Vec<&Donation> = self
            .donations
            .iter()
            .filter(|donation| {
                donation.donor_type() == DonorType::BuyerDirect && donation.buyer() == Some(buyer)
            })
            .collect();

        Ok(self.summarize(ImpactScope::Buyer(buyer), &in_scope, now))
    }

    /// A shop's impact summary: its seller contributions only.
    ///
    /// Callable by that shop's seller or an admin.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Access`] if the caller does not manage the
    /// shop, or [`ReportError::ShopNotFound`] if the shop does not exist.
    pub fn shop_summary(
        &self,
        identity: &Identity,
        shop: ShopKey,
        now: DateTime<Utc>,
    ) -> Result<DonationSummary, ReportError> {
        identity.require_shop(shop)?;

        if !self.shops.contains_key(shop) {
            return Err(ReportError::ShopNotFound(shop));
        }

        let in_scope: Vec<&Donation> = self
            .donations
            .iter()
            .filter(|donation| {
                donation.donor_type() == DonorType::SellerContribution
                    && donation.shop() == Some(shop)
            })
            .collect();

        Ok(self.summarize(ImpactScope::Shop(shop), &in_scope, now))
    }

    /// The platform-wide summary across all donor types. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::AdminRequired`] for non-admin callers.
    pub fn platform_summary(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<DonationSummary, ReportError> {
        identity.require_admin()?;

        let in_scope: Vec<&Donation> = self.donations.iter().collect();

        Ok(self.summarize(ImpactScope::Platform, &in_scope, now))
    }

    /// Trailing 12-month revenue series over non-cancelled order totals.
    /// Admin only; feeds the revenue projection.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::AdminRequired`] for non-admin callers.
    pub fn monthly_revenue(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<Vec<MonthlyBucket>, ReportError> {
        identity.require_admin()?;

        let windows = month_windows(now, TRAILING_MONTHS);

        let in_scope: Vec<&Order<'a>> = self
            .orders
            .iter()
            .filter(|order| order.status() != OrderStatus::Cancelled)
            .collect();

        Ok(fold_into_buckets(
            &windows,
            &in_scope,
            |order| order.created_at(),
            |order| crate::donations::split::to_major_units(order.total()),
        ))
    }

    /// Fold in-scope donations into a summary.
    fn summarize(
        &self,
        scope: ImpactScope,
        donations: &[&Donation],
        now: DateTime<Utc>,
    ) -> DonationSummary {
        let mut total_donated = Decimal::ZERO;
        let mut paid = Decimal::ZERO;
        let mut pending = Decimal::ZERO;

        let mut per_nonprofit: FxHashMap<NonprofitKey, (Decimal, usize)> = FxHashMap::default();

        for donation in donations {
            let amount = donation.amount();
            total_donated += amount;

            if donation.is_paid() {
                paid += amount;
            } else {
                pending += amount;
            }

            let entry = per_nonprofit
                .entry(donation.nonprofit())
                .or_insert((Decimal::ZERO, 0));
            entry.0 += amount;
            entry.1 += 1;
        }

        let mut by_nonprofit: Vec<NonprofitBreakdown> = per_nonprofit
            .into_iter()
            .map(|(key, (total, count))| NonprofitBreakdown {
                nonprofit: key,
                name: self
                    .nonprofits
                    .get(key)
                    .map_or_else(|| "<unknown>".to_string(), |nonprofit| nonprofit.name.clone()),
                total,
                count,
            })
            .collect();

        by_nonprofit.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

        let windows = month_windows(now, TRAILING_MONTHS);
        let monthly = fold_into_buckets(&windows, donations, |d| d.created_at(), Donation::amount);

        DonationSummary {
            scope,
            total_donated,
            paid,
            pending,
            donation_count: donations.len(),
            by_nonprofit,
            monthly,
        }
    }
}

//! Signup cohort retention
//!
//! Groups buyers by the calendar month they signed up and asks, for each
//! cohort, how many went on to place at least one order. Admin only.

use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};
use rustc_hash::FxHashMap;

use crate::context::Identity;

use super::{Ledger, ReportError, monthly::MonthWindow};

/// One signup cohort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortRow {
    /// Signup month label, e.g. `"Nov 2025"`
    pub label: String,

    /// Buyers who signed up in the month
    pub total: usize,

    /// Of those, buyers who placed at least one order after signup
    pub active: usize,

    /// `active / total` as a percentage with one decimal place
    pub retention_percent: Decimal,
}

/// Retention by signup cohort, oldest cohort first. Admin only.
///
/// A buyer counts as active once they have placed any order at or after
/// their signup instant.
///
/// # Errors
///
/// Returns [`crate::context::AccessError::AdminRequired`] for non-admin
/// callers.
pub fn retention(ledger: &Ledger<'_>, identity: &Identity) -> Result<Vec<CohortRow>, ReportError> {
    identity.require_admin()?;

    let mut cohorts: FxHashMap<(i32, u32), (usize, usize)> = FxHashMap::default();

    for (key, buyer) in ledger.buyers() {
        let signup = buyer.signed_up_at;
        let month = (signup.year(), signup.month());

        let active = ledger
            .orders()
            .iter()
            .any(|order| order.buyer() == key && order.created_at() >= signup);

        let entry = cohorts.entry(month).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += usize::from(active);
    }

    let mut months: Vec<(i32, u32)> = cohorts.keys().copied().collect();
    months.sort_unstable();

    let rows = months
        .into_iter()
        .filter_map(|(year, month)| {
            cohorts.get(&(year, month)).map(|&(total, active)| CohortRow {
                label: MonthWindow::of(year, month).label(),
                total,
                active,
                retention_percent: retention_rate(active, total),
            })
        })
        .collect();

    Ok(rows)
}

/// `active / total` as a percentage with one decimal place, half-up.
fn retention_rate(active: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }

    let active = Decimal::from(u64::try_from(active).unwrap_or(u64::MAX));
    let total = Decimal::from(u64::try_from(total).unwrap_or(u64::MAX));

    (active / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        buyers::{Buyer, BuyerKey},
        context::Identity,
        orders::{Order, OrderId},
        shops::ShopKey,
    };

    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        match Utc.with_ymd_and_hms(year, month, day, 12, 0, 0) {
            chrono::LocalResult::Single(dt) => dt,
            other => panic!("expected a single timestamp, got {other:?}"),
        }
    }

    fn bare_order(id: u64, buyer: BuyerKey, placed_at: DateTime<Utc>) -> Order<'static> {
        let mut shops = slotmap::SlotMap::<ShopKey, ()>::with_key();

        Order::new(
            OrderId(id),
            buyer,
            shops.insert(()),
            Vec::new(),
            Money::from_minor(1000, USD),
            Money::from_minor(0, USD),
            Money::from_minor(1000, USD),
            Decimal::ZERO,
            placed_at,
        )
    }

    #[test]
    fn retention_requires_admin() {
        let ledger = Ledger::new();

        let mut shops = slotmap::SlotMap::<ShopKey, ()>::with_key();
        let result = retention(&ledger, &Identity::seller(shops.insert(())));

        assert!(result.is_err(), "seller should not see cohort data");
    }

    #[test]
    fn cohorts_group_by_signup_month() -> TestResult {
        let mut ledger = Ledger::new();

        // Three November signups, one of whom ordered; one December signup
        // who ordered.
        let nov_active = ledger.add_buyer(Buyer::new("Ada", at(2025, 11, 2)));
        let _nov_idle = ledger.add_buyer(Buyer::new("Ben", at(2025, 11, 10)));
        let _nov_idle_2 = ledger.add_buyer(Buyer::new("Cam", at(2025, 11, 20)));
        let dec_active = ledger.add_buyer(Buyer::new("Dee", at(2025, 12, 5)));

        ledger.orders.push(bare_order(1, nov_active, at(2026, 1, 3)));
        ledger.orders.push(bare_order(2, dec_active, at(2025, 12, 9)));

        let rows = retention(&ledger, &Identity::admin())?;

        assert_eq!(rows.len(), 2);

        let labels: Vec<&str> = rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, vec!["Nov 2025", "Dec 2025"]);

        let Some(november) = rows.first() else {
            panic!("expected a November cohort");
        };

        assert_eq!(november.total, 3);
        assert_eq!(november.active, 1);
        // 1/3 = 33.3%
        assert_eq!(november.retention_percent, Decimal::new(333, 1));

        Ok(())
    }

    #[test]
    fn orders_before_signup_do_not_count() -> TestResult {
        let mut ledger = Ledger::new();

        let buyer = ledger.add_buyer(Buyer::new("Eve", at(2026, 2, 1)));
        ledger.orders.push(bare_order(1, buyer, at(2026, 1, 15)));

        let rows = retention(&ledger, &Identity::admin())?;

        let Some(row) = rows.first() else {
            panic!("expected a cohort row");
        };

        assert_eq!(row.active, 0);
        assert_eq!(row.retention_percent, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn rate_has_exactly_one_decimal_place() {
        assert_eq!(retention_rate(2, 3), Decimal::new(667, 1));
        assert_eq!(retention_rate(1, 1), Decimal::new(1000, 1));
        assert_eq!(retention_rate(0, 5), Decimal::ZERO);
    }
}

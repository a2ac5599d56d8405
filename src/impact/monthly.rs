//! Calendar month windows
//!
//! Reports bucket activity by calendar month. The windows are generated up
//! front as an explicit sequence, oldest first, and the fold filters records
//! into them; no date arithmetic is scattered across call sites.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Number of trailing months in every report series, current month included.
pub const TRAILING_MONTHS: usize = 12;

/// One calendar month, from its first to its last instant, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// First instant of the month
    pub start: DateTime<Utc>,

    /// Last instant of the month
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// Window for the month containing the given year and 1-based month.
    #[must_use]
    pub fn of(year: i32, month: u32) -> Self {
        let start = month_start(year, month);
        let (next_year, next_month) = month_after(year, month);
        let end = month_start(next_year, next_month) - Duration::nanoseconds(1);

        Self { start, end }
    }

    /// Human-readable label, e.g. `"Mar 2026"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }

    /// Whether a timestamp falls within the window, bounds inclusive.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// First instant of a month.
fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) else {
        unreachable!("day 1 exists in every month")
    };

    let Some(start) = date.and_hms_opt(0, 0, 0) else {
        unreachable!("midnight exists on every day")
    };

    start.and_utc()
}

/// The (year, month) pair following the given one.
#[must_use]
pub fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Windows for the trailing `n` calendar months including the month of
/// `now`, oldest first.
#[must_use]
pub fn month_windows(now: DateTime<Utc>, n: usize) -> Vec<MonthWindow> {
    let mut year = now.year();
    let mut month = now.month();

    let mut windows = Vec::with_capacity(n);

    for _ in 0..n {
        windows.push(MonthWindow::of(year, month));

        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }

    windows.reverse();
    windows
}

/// One month's worth of bucketed activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBucket {
    /// Label of the month, e.g. `"Mar 2026"`
    pub label: String,

    /// Exact amount for the month (0 when nothing happened)
    pub amount: Decimal,

    /// Number of records in the month
    pub count: usize,
}

/// Fold records into the given windows.
///
/// Every window produces a bucket; months with no activity appear with a
/// zero amount and a zero count.
pub fn fold_into_buckets<T>(
    windows: &[MonthWindow],
    records: &[&T],
    timestamp: impl Fn(&T) -> DateTime<Utc>,
    amount: impl Fn(&T) -> Decimal,
) -> Vec<MonthlyBucket> {
    windows
        .iter()
        .map(|window| {
            let mut total = Decimal::ZERO;
            let mut count = 0usize;

            for record in records {
                if window.contains(timestamp(record)) {
                    total += amount(record);
                    count += 1;
                }
            }

            MonthlyBucket {
                label: window.label(),
                amount: total,
                count,
            }
        })
        .collect()
}

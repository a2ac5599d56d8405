//! Revenue trend projection
//!
//! Fits a least-squares line through the trailing monthly revenue series and
//! extends it forward. The output is a projection of the current trend, not
//! a guarantee of future revenue, and it is named accordingly.

use chrono::{DateTime, Datelike, Utc};
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive};

use super::monthly::{MonthWindow, MonthlyBucket, month_after};

/// Default number of months projected forward.
pub const FORECAST_HORIZON: usize = 3;

/// One projected month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedMonth {
    /// Label of the projected month, e.g. `"Sep 2026"`
    pub label: String,

    /// Projected revenue in major units, 2 decimal places, never negative
    pub projected_revenue: Decimal,
}

/// Project revenue `horizon` months past the end of `history`.
///
/// `history` is a trailing monthly series ending at the month of `now`
/// (as produced by [`super::Ledger::monthly_revenue`]). With fewer than two
/// points there is no trend to fit, so the projection degrades to a flat
/// line at the last known value, or zero with no history at all.
#[must_use]
pub fn project_revenue(
    history: &[MonthlyBucket],
    now: DateTime<Utc>,
    horizon: usize,
) -> Vec<ProjectedMonth> {
    let amounts: Vec<f64> = history
        .iter()
        .map(|bucket| bucket.amount.to_f64().unwrap_or(0.0))
        .collect();

    let labels = future_labels(now, horizon);

    let trend = fit_line(&amounts);

    labels
        .into_iter()
        .enumerate()
        .map(|(offset, label)| {
            let x = to_f64(amounts.len() + offset);
            let projected = trend.at(x).max(0.0);

            ProjectedMonth {
                label,
                projected_revenue: Decimal::from_f64(projected)
                    .unwrap_or(Decimal::ZERO)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            }
        })
        .collect()
}

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Trend {
    slope: f64,
    intercept: f64,
}

impl Trend {
    fn at(self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares fit over `(0, y0), (1, y1), ...`.
///
/// Fewer than two points yields a flat line at the last value (or zero).
fn fit_line(amounts: &[f64]) -> Trend {
    if amounts.len() < 2 {
        return Trend {
            slope: 0.0,
            intercept: amounts.last().copied().unwrap_or(0.0),
        };
    }

    let n = to_f64(amounts.len());

    let sum_x: f64 = (0..amounts.len()).map(to_f64).sum();
    let sum_y: f64 = amounts.iter().sum();
    let sum_xy: f64 = amounts
        .iter()
        .enumerate()
        .map(|(x, y)| to_f64(x) * y)
        .sum();
    let sum_x2: f64 = (0..amounts.len()).map(|x| to_f64(x).powi(2)).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;

    if denominator.abs() < f64::EPSILON {
        return Trend {
            slope: 0.0,
            intercept: amounts.last().copied().unwrap_or(0.0),
        };
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    Trend { slope, intercept }
}

/// Labels for the `horizon` months following the month of `now`.
fn future_labels(now: DateTime<Utc>, horizon: usize) -> Vec<String> {
    let mut year = now.year();
    let mut month = now.month();

    let mut labels = Vec::with_capacity(horizon);

    for _ in 0..horizon {
        (year, month) = month_after(year, month);
        labels.push(MonthWindow::of(year, month).label());
    }

    labels
}

/// Lossless for the month counts involved here.
fn to_f64(value: usize) -> f64 {
    u32::try_from(value).map_or(f64::MAX, f64::from)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        match Utc.with_ymd_and_hms(year, month, day, 12, 0, 0) {
            chrono::LocalResult::Single(dt) => dt,
            other => panic!("expected a single timestamp, got {other:?}"),
        }
    }

    fn series(amounts: &[i64]) -> Vec<MonthlyBucket> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| MonthlyBucket {
                label: format!("M{i}"),
                amount: Decimal::from(*amount),
                count: 1,
            })
            .collect()
    }

    #[test]
    fn linear_history_projects_linearly() {
        // 100, 200, 300 -> 400, 500, 600
        let history = series(&[100, 200, 300]);

        let projection = project_revenue(&history, at(2026, 8, 26), FORECAST_HORIZON);

        let amounts: Vec<Decimal> = projection
            .iter()
            .map(|month| month.projected_revenue)
            .collect();

        assert_eq!(
            amounts,
            vec![
                Decimal::new(400_00, 2),
                Decimal::new(500_00, 2),
                Decimal::new(600_00, 2)
            ]
        );
    }

    #[test]
    fn future_labels_follow_the_series() {
        let history = series(&[100, 200]);

        let projection = project_revenue(&history, at(2026, 11, 5), 3);

        let labels: Vec<&str> = projection.iter().map(|month| month.label.as_str()).collect();

        assert_eq!(labels, vec!["Dec 2026", "Jan 2027", "Feb 2027"]);
    }

    #[test]
    fn single_point_degrades_to_flat_projection() {
        let history = series(&[250]);

        let projection = project_revenue(&history, at(2026, 8, 26), 3);

        assert!(
            projection
                .iter()
                .all(|month| month.projected_revenue == Decimal::new(250_00, 2)),
            "flat projection expected with one data point"
        );
    }

    #[test]
    fn empty_history_projects_zero() {
        let projection = project_revenue(&[], at(2026, 8, 26), 3);

        assert_eq!(projection.len(), 3);
        assert!(
            projection
                .iter()
                .all(|month| month.projected_revenue == Decimal::ZERO),
            "zero projection expected with no history"
        );
    }

    #[test]
    fn declining_trend_clamps_at_zero() {
        // Steep decline crosses zero inside the horizon.
        let history = series(&[300, 150, 0]);

        let projection = project_revenue(&history, at(2026, 8, 26), 3);

        assert!(
            projection
                .iter()
                .all(|month| month.projected_revenue >= Decimal::ZERO),
            "projection must never go negative"
        );
    }
}

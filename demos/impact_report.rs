//! Impact Report Example
//!
//! Loads a ledger fixture and prints the admin-facing platform report: the
//! donation summary tables, cohort retention, and a revenue projection.
//!
//! Use `-l` to load a ledger fixture by name
//! Use `-p` to change the number of projected months
//!
//! Run with: `cargo run --example impact_report`

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use evercraft::{
    context::Identity,
    fixtures::Fixture,
    impact::{cohort, forecast, render},
    utils::ExampleReportArgs,
};

/// Impact Report Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleReportArgs::parse();

    let ledger = Fixture::from_set(&args.ledger)?;

    let admin = Identity::admin();
    let now = Utc::now();

    let summary = ledger.platform_summary(&admin, now)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    render::write_summary(&mut handle, &summary)?;

    println!("\nCohort retention:");

    for row in cohort::retention(&ledger, &admin)? {
        println!(
            "  {}: {}/{} active ({}%)",
            row.label, row.active, row.total, row.retention_percent
        );
    }

    let history = ledger.monthly_revenue(&admin, now)?;
    let projection = forecast::project_revenue(&history, now, args.projection_months);

    println!("\nProjected revenue:");

    for month in projection {
        println!("  {}: {}", month.label, month.projected_revenue);
    }

    Ok(())
}

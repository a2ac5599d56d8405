//! Report rendering
//!
//! Turns a donation summary into console tables for the demo and admin CLI
//! surfaces.

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use super::DonationSummary;

/// Errors that can occur while rendering a report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Underlying stream failure
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Write a summary as a monthly table, a nonprofit breakdown, and totals.
///
/// # Errors
///
/// Returns a [`RenderError::Io`] if the output cannot be written.
pub fn write_summary(
    mut out: impl io::Write,
    summary: &DonationSummary,
) -> Result<(), RenderError> {
    write_monthly_table(&mut out, summary)?;
    write_nonprofit_table(&mut out, summary)?;
    write_totals(&mut out, summary)
}

fn write_monthly_table(
    out: &mut impl io::Write,
    summary: &DonationSummary,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record(["Month", "Donations", "Amount"]);

    for bucket in &summary.monthly {
        builder.push_record([
            bucket.label.clone(),
            bucket.count.to_string(),
            format!("{:.2}", bucket.amount),
        ]);
    }

    write_table(out, builder)
}

fn write_nonprofit_table(
    out: &mut impl io::Write,
    summary: &DonationSummary,
) -> Result<(), RenderError> {
    if summary.by_nonprofit.is_empty() {
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Nonprofit", "Donations", "Total"]);

    for breakdown in &summary.by_nonprofit {
        builder.push_record([
            breakdown.name.clone(),
            breakdown.count.to_string(),
            format!("{:.2}", breakdown.total),
        ]);
    }

    write_table(out, builder)
}

fn write_table(out: &mut impl io::Write, builder: Builder) -> Result<(), RenderError> {
    let mut table = builder.build();

    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..3), Alignment::right());

    writeln!(out, "\n{table}")?;

    Ok(())
}

fn write_totals(out: &mut impl io::Write, summary: &DonationSummary) -> Result<(), RenderError> {
    writeln!(
        out,
        "\n Total donated: {:.2}  (paid {:.2}, pending {:.2})",
        summary.total_donated_rounded(),
        summary.paid,
        summary.pending
    )?;

    Ok(())
}

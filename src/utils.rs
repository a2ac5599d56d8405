//! Utils

use clap::Parser;

/// Arguments for the report examples
#[derive(Debug, Parser)]
pub struct ExampleReportArgs {
    /// Ledger fixture to load
    #[clap(short, long, default_value = "demo")]
    pub ledger: String,

    /// Months of revenue to project past the current month
    #[clap(short = 'p', long, default_value_t = crate::impact::forecast::FORECAST_HORIZON)]
    pub projection_months: usize,
}

//! The monthly totals chart.
//!
//! - [aggregation] sums transactions per calendar month and keeps the most recent months,
//! - [charts] turns those totals into an ECharts bar chart and its page markup.

mod aggregation;
mod charts;

pub use aggregation::{CHART_MONTHS, MonthlyTotal, monthly_totals};
pub(crate) use charts::{monthly_chart_script, monthly_chart_view};

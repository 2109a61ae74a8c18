//! Monthly aggregation of transaction amounts.

use std::collections::BTreeMap;

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::transaction::{Amount, Transaction};

/// The number of months shown in the chart.
pub const CHART_MONTHS: usize = 6;

const LABEL_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[month repr:short] [year]");

/// The sum of transaction amounts in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// The first day of the month.
    pub month: Date,
    /// The exact sum of every amount in the month.
    pub total: Amount,
}

impl MonthlyTotal {
    /// The chart label for the month, e.g. "Jan 2024".
    pub fn label(&self) -> String {
        self.month
            .format(LABEL_FORMAT)
            .unwrap_or_else(|_| self.month.to_string())
    }
}

/// Sums `transactions` per month and returns the [CHART_MONTHS] most recent
/// months that have transactions, oldest first.
///
/// Months without any transactions are skipped rather than reported as zero.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<Date, Amount> = BTreeMap::new();

    for transaction in transactions {
        *totals.entry(first_of_month(transaction.date)).or_default() += transaction.amount;
    }

    let skip = totals.len().saturating_sub(CHART_MONTHS);

    totals
        .into_iter()
        .skip(skip)
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

fn first_of_month(date: Date) -> Date {
    // Day one exists in every month.
    date.replace_day(1).unwrap_or(date)
}

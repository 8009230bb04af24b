//! Frequency normalization
//!
//! Monthly is the common unit for aggregation, comparison and sorting.

use crate::models::{format_currency, Expense, Frequency};

/// Months per year, the yearly-to-monthly divisor
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Canonical monthly cost of an expense
///
/// Never rounded; rounding happens only at display time.
pub fn monthly_amount(expense: &Expense) -> f64 {
    normalize(expense.amount.value(), expense.frequency)
}

/// Convert a stated amount at `frequency` to its monthly equivalent
pub fn normalize(amount: f64, frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Monthly => amount,
        Frequency::Yearly => amount / MONTHS_PER_YEAR,
    }
}

/// Format the stated amount with its frequency, e.g. "$1200.00/year"
pub fn format_amount_with_frequency(expense: &Expense, symbol: &str) -> String {
    format!(
        "{}/{}",
        format_currency(expense.amount.value(), symbol),
        expense.frequency.suffix()
    )
}

//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod category;
pub mod expense;
pub mod export;
pub mod history;
pub mod member;
pub mod personal;
pub mod summary;

pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportArgs};
pub use history::handle_history_command;
pub use member::{handle_member_command, MemberCommands};
pub use personal::{handle_personal_command, PersonalCommands};
pub use summary::{handle_summary_command, SummaryArgs};

use crate::error::{LedgerError, LedgerResult};

/// Parse a non-negative money figure such as "3000", "$3,000.50" or "0"
pub(crate) fn parse_money(s: &str) -> LedgerResult<f64> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();

    let value: f64 = cleaned
        .parse()
        .map_err(|_| LedgerError::Validation(format!("Invalid amount: {}", s)))?;

    if !value.is_finite() || value < 0.0 {
        return Err(LedgerError::Validation(format!(
            "Amount must be zero or more (got {})",
            s
        )));
    }

    Ok(value)
}

/// Parse a fraction given as "0.25" or "25%"
pub(crate) fn parse_fraction(s: &str) -> LedgerResult<f64> {
    let trimmed = s.trim();
    let (number, scale) = match trimmed.strip_suffix('%') {
        Some(pct) => (pct.trim(), 100.0),
        None => (trimmed, 1.0),
    };

    number
        .parse::<f64>()
        .map(|v| v / scale)
        .map_err(|_| LedgerError::Validation(format!("Invalid fraction: {}", s)))
}

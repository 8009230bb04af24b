//! Display formatting for terminal output
//!
//! Formatters build plain strings; the CLI decides where they go. Collapse
//! state lives here because only presentation code reads it.

pub mod category;
pub mod collapse;
pub mod expense;
pub mod member;

pub use category::{format_category_list, format_personal_category_list};
pub use collapse::CollapseState;
pub use expense::{format_expense_details, format_expense_list, format_shares};
pub use member::{format_member_details, format_member_list};

/// Truncate to `max` characters, marking the cut with an ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

//! Calculation engine
//!
//! Pure functions over in-memory snapshots: frequency normalization, split
//! resolution, category aggregation and sorting. Nothing here performs I/O or
//! mutates its inputs.

pub mod aggregate;
pub mod frequency;
pub mod sort;
pub mod split;

pub use aggregate::{
    group_personal_expenses, order_categories, CategoryTotals, GroupKey, PersonalGroup,
    UNCATEGORIZED_LABEL,
};
pub use frequency::{format_amount_with_frequency, monthly_amount, normalize, MONTHS_PER_YEAR};
pub use sort::{compare_names, sort_expenses, SortKey, SortOrder, SortState};
pub use split::{
    compute_monthly_shares, compute_shares, default_percentage_shares, distribute,
    validate_percentage_shares, validate_split, Shares, SplitValidationError, SPLIT_TOLERANCE,
};

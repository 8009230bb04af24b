//! Reports for the household ledger

pub mod summary;

pub use summary::{CategoryRow, ExpenseRow, HouseholdSummary, MemberBalance, PersonalGroupRow};

//! Core data models for the household ledger
//!
//! This module contains the data structures supplied by the sync layer:
//! members, expenses, expense categories and personal categories.

pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod palette;
pub mod user;

pub use category::{CategoryValidationError, ExpenseCategory, PersonalExpenseCategory};
pub use expense::{Expense, ExpenseValidationError, Frequency, ShareMap, SplitStrategy, SplitType};
pub use ids::{CategoryId, ExpenseId, PersonalCategoryId, UserId, SHARED_CATEGORY_ID};
pub use money::{format_currency, Amount, AmountError};
pub use palette::{palette_color, MEMBER_PALETTE};
pub use user::{User, UserValidationError, DEFAULT_TAX_RATE};

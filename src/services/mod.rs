//! Service layer for the household ledger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, audit logging, and cross-entity operations.

pub mod category;
pub mod expense;
pub mod member;

pub use category::CategoryService;
pub use expense::{
    ExpenseFilter, ExpenseService, ExpenseShares, ExpenseUpdate, LocatedExpense, NewExpense,
};
pub use member::{MemberService, MemberUpdate};

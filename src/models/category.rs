//! Expense category models
//!
//! Top-level categories own an ordered list of expenses. Personal categories
//! are lightweight tags that personal expenses point at; they can be removed
//! while expenses still reference them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::Expense;
use super::ids::{CategoryId, ExpenseId, PersonalCategoryId};

/// A top-level expense category (e.g. "Shared", "Groceries")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Expenses in display order
    #[serde(default)]
    pub expenses: Vec<Expense>,

    /// Whether the category is collapsed in the UI
    #[serde(default)]
    pub collapsed: bool,
}

impl ExpenseCategory {
    /// Create a new, empty category
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(CategoryId::new(), name)
    }

    /// Create a category with a caller-chosen id
    pub fn with_id(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            expenses: Vec::new(),
            collapsed: false,
        }
    }

    /// The shared household category
    pub fn shared() -> Self {
        Self::with_id(CategoryId::shared(), "Shared")
    }

    /// Find an expense in this category
    pub fn expense(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| &e.id == id)
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A personal sub-category (e.g. "Streaming", "Hobbies")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalExpenseCategory {
    /// Unique identifier
    pub id: PersonalCategoryId,

    /// Category name
    pub name: String,

    /// Whether the group is collapsed in the UI
    #[serde(default)]
    pub collapsed: bool,
}

impl PersonalExpenseCategory {
    /// Create a new personal category
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(PersonalCategoryId::new(), name)
    }

    /// Create a personal category with a caller-chosen id
    pub fn with_id(id: PersonalCategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            collapsed: false,
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)
    }
}

impl fmt::Display for PersonalExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn validate_name(name: &str) -> Result<(), CategoryValidationError> {
    if name.trim().is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }

    if name.len() > 50 {
        return Err(CategoryValidationError::NameTooLong(name.len()));
    }

    Ok(())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = ExpenseCategory::new("Groceries");
        assert_eq!(category.name, "Groceries");
        assert!(category.expenses.is_empty());
        assert!(!category.collapsed);
        assert!(!category.id.is_shared());
    }

    #[test]
    fn test_shared_category() {
        let shared = ExpenseCategory::shared();
        assert!(shared.id.is_shared());
        assert_eq!(shared.name, "Shared");
    }

    #[test]
    fn test_validation() {
        let mut category = ExpenseCategory::new("Valid");
        assert!(category.validate().is_ok());

        category.name = String::new();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        let mut personal = PersonalExpenseCategory::new("Hobbies");
        assert!(personal.validate().is_ok());
        personal.name = "a".repeat(51);
        assert!(matches!(
            personal.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"id":"rent","name":"Rent"}"#;
        let category: ExpenseCategory = serde_json::from_str(json).unwrap();
        assert!(category.expenses.is_empty());
        assert!(!category.collapsed);
    }
}

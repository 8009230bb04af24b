//! Expense model
//!
//! An expense is a recurring cost stated either per month or per year. How it
//! is split between household members is carried by a tagged strategy so
//! that share data can only exist on shared expenses and an owner can only
//! exist on personal ones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ids::{ExpenseId, PersonalCategoryId, UserId};
use super::money::Amount;

/// How often the stated amount recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    /// Short suffix used in display strings
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Monthly => "month",
            Self::Yearly => "year",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "Monthly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

/// Fraction of a shared expense owed by each participant
pub type ShareMap = BTreeMap<UserId, f64>;

/// Who carries an expense and in what proportion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Split evenly between all household members
    Equal,
    /// Split by explicit fractions that sum to one
    Percentage {
        #[serde(default)]
        shares: ShareMap,
    },
    /// Not split: owned wholly by one member
    Fixed { owner: UserId },
}

impl SplitStrategy {
    /// The strategy's discriminant
    pub fn split_type(&self) -> SplitType {
        match self {
            Self::Equal => SplitType::Equal,
            Self::Percentage { .. } => SplitType::Percentage,
            Self::Fixed { .. } => SplitType::Fixed,
        }
    }
}

/// Split strategy discriminant, used for selection and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Percentage,
    Fixed,
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Percentage => write!(f, "percentage"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

/// A tracked recurring expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Expense name
    pub name: String,

    /// Stated amount per `frequency`
    pub amount: Amount,

    /// How often the amount recurs
    #[serde(default)]
    pub frequency: Frequency,

    /// Split strategy
    pub split: SplitStrategy,

    /// Member who pays the bill
    pub paid_by: UserId,

    /// Sub-category for personal expenses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_category_id: Option<PersonalCategoryId>,

    /// Budgeted (variable) rather than fixed cost
    #[serde(default)]
    pub is_budgeted: bool,
}

impl Expense {
    /// Create a new expense with a fresh id
    pub fn new(
        name: impl Into<String>,
        amount: Amount,
        frequency: Frequency,
        split: SplitStrategy,
        paid_by: UserId,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            name: name.into(),
            amount,
            frequency,
            split,
            paid_by,
            personal_category_id: None,
            is_budgeted: false,
        }
    }

    /// Builder-style budgeted flag
    pub fn budgeted(mut self, is_budgeted: bool) -> Self {
        self.is_budgeted = is_budgeted;
        self
    }

    /// Builder-style personal category
    pub fn in_personal_category(mut self, category: PersonalCategoryId) -> Self {
        self.personal_category_id = Some(category);
        self
    }

    /// Whether the expense is split across the household
    pub fn is_shared(&self) -> bool {
        !matches!(self.split, SplitStrategy::Fixed { .. })
    }

    /// Owner of a personal expense
    pub fn owner(&self) -> Option<&UserId> {
        match &self.split {
            SplitStrategy::Fixed { owner } => Some(owner),
            _ => None,
        }
    }

    /// The expense's split discriminant
    pub fn split_type(&self) -> SplitType {
        self.split.split_type()
    }

    /// Validate the expense shape (split fractions are checked by the resolver)
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.name.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(ExpenseValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Expense name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Expense name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

//! Household member model
//!
//! Users are supplied by the membership workflow. Only the fields the split
//! and summary calculations need are modelled here.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// Tax rate assigned to newly approved members
pub const DEFAULT_TAX_RATE: f64 = 0.32;

/// An approved household member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Gross monthly income
    #[serde(default)]
    pub monthly_income: f64,

    /// Display color (hex)
    pub color: String,

    /// Fraction of gross income withheld as tax
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

impl User {
    /// Create a new member with no income and the default tax rate
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            monthly_income: 0.0,
            color: color.into(),
            tax_rate: DEFAULT_TAX_RATE,
        }
    }

    /// Builder-style income setter
    pub fn with_income(mut self, monthly_income: f64) -> Self {
        self.monthly_income = monthly_income;
        self
    }

    /// Monthly income after tax
    pub fn net_monthly_income(&self) -> f64 {
        self.monthly_income * (1.0 - self.tax_rate)
    }

    /// Validate the user
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }

        if !self.monthly_income.is_finite() || self.monthly_income < 0.0 {
            return Err(UserValidationError::NegativeIncome(self.monthly_income));
        }

        if !self.tax_rate.is_finite() || !(0.0..1.0).contains(&self.tax_rate) {
            return Err(UserValidationError::InvalidTaxRate(self.tax_rate));
        }

        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq)]
pub enum UserValidationError {
    EmptyName,
    NegativeIncome(f64),
    InvalidTaxRate(f64),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Member name cannot be empty"),
            Self::NegativeIncome(v) => {
                write!(f, "Monthly income must be zero or more (got {})", v)
            }
            Self::InvalidTaxRate(v) => {
                write!(f, "Tax rate must be between 0 and 1 (got {})", v)
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

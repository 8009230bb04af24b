//! Amount type for representing expense amounts
//!
//! Amounts are kept as `f64` so that derived figures (yearly / 12, percentage
//! shares) carry full precision until final display. The newtype guarantees
//! the stored value is finite and strictly positive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated, strictly positive expense amount
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    /// Create an amount, rejecting zero, negative and non-finite values
    ///
    /// # Examples
    /// ```
    /// use household_ledger::models::Amount;
    /// assert!(Amount::new(12.5).is_ok());
    /// assert!(Amount::new(0.0).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotFinite);
        }
        if value <= 0.0 {
            return Err(AmountError::NotPositive(value));
        }
        Ok(Self(value))
    }

    /// Get the raw value
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Parse an amount from user input
    ///
    /// Accepts formats: "10.50", "$10.50", "1,200", "1200"
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();

        let value: f64 = cleaned
            .parse()
            .map_err(|_| AmountError::InvalidFormat(s.to_string()))?;

        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_currency(self.0, "$"))
    }
}

impl TryFrom<f64> for Amount {
    type Error = AmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Format a monetary figure for display, rounding only here
pub fn format_currency(value: f64, symbol: &str) -> String {
    // Avoid printing "-$0.00" for tiny negative float residue
    let rounded = (value * 100.0).round() / 100.0;
    if rounded < 0.0 {
        format!("-{}{:.2}", symbol, rounded.abs())
    } else {
        format!("{}{:.2}", symbol, rounded.abs())
    }
}

/// Error type for amount validation and parsing
#[derive(Debug, Clone, PartialEq)]
pub enum AmountError {
    InvalidFormat(String),
    NotFinite,
    NotPositive(f64),
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::InvalidFormat(s) => write!(f, "Invalid amount format: {}", s),
            AmountError::NotFinite => write!(f, "Amount must be a finite number"),
            AmountError::NotPositive(v) => write!(f, "Amount must be greater than zero (got {})", v),
        }
    }
}

impl std::error::Error for AmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_non_positive() {
        assert_eq!(Amount::new(0.0), Err(AmountError::NotPositive(0.0)));
        assert_eq!(Amount::new(-5.0), Err(AmountError::NotPositive(-5.0)));
        assert_eq!(Amount::new(f64::NAN), Err(AmountError::NotFinite));
        assert_eq!(Amount::new(f64::INFINITY), Err(AmountError::NotFinite));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Amount::parse("10.50").unwrap().value(), 10.5);
        assert_eq!(Amount::parse("$10.50").unwrap().value(), 10.5);
        assert_eq!(Amount::parse("1,200").unwrap().value(), 1200.0);
        assert!(matches!(
            Amount::parse("abc"),
            Err(AmountError::InvalidFormat(_))
        ));
        assert!(Amount::parse("-3").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(1050.0).unwrap().to_string(), "$1050.00");
        assert_eq!(Amount::new(0.05).unwrap().to_string(), "$0.05");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1000.0 / 3.0, "$"), "$333.33");
        assert_eq!(format_currency(-12.5, "€"), "-€12.50");
        assert_eq!(format_currency(-0.0001, "$"), "$0.00");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Amount = serde_json::from_str("12.5").unwrap();
        assert_eq!(ok.value(), 12.5);
        assert!(serde_json::from_str::<Amount>("0").is_err());
        assert!(serde_json::from_str::<Amount>("-1").is_err());
    }

    #[test]
    fn test_serialization() {
        let amount = Amount::new(99.99).unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "99.99");
    }
}

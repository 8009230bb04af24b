//! Expense ordering
//!
//! Sorting is stable in both directions: descending order reverses the
//! comparator rather than the output, so expenses with equal keys keep their
//! original relative order however many times the list is re-sorted.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::frequency::monthly_amount;
use crate::models::Expense;

/// Field to sort expenses by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    /// Normalized monthly amount
    Amount,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Amount => write!(f, "amount"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "amount" => Ok(Self::Amount),
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}

/// Current sort selection for an expense list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortState {
    /// Start sorted ascending by `key`
    pub fn new(key: SortKey) -> Self {
        Self {
            key,
            order: SortOrder::Asc,
        }
    }

    /// Select a sort key
    ///
    /// Re-selecting the current key flips the order; selecting a different
    /// key resets to ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.order = self.order.flipped();
        } else {
            self.key = key;
            self.order = SortOrder::Asc;
        }
    }

    /// Apply this selection to a list of expenses
    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        sort_expenses(expenses, self.key, self.order)
    }
}

/// Return the expenses in a new, stably sorted vector
pub fn sort_expenses(expenses: &[Expense], key: SortKey, order: SortOrder) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: &Expense, b: &Expense, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => compare_names(&a.name, &b.name),
        SortKey::Amount => monthly_amount(a).total_cmp(&monthly_amount(b)),
    }
}

/// Case-insensitive, accent-aware name comparison
///
/// Names compare on their base letters first, so "Élan" sorts between "eau"
/// and "Fuel". Accents only break ties between otherwise equal names; case
/// never does.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| with_accents(a).cmp(with_accents(b)))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn with_accents(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Frequency, SplitStrategy, UserId};
    use proptest::prelude::*;

    fn expense(name: &str, amount: f64, frequency: Frequency) -> Expense {
        Expense::new(
            name,
            Amount::new(amount).unwrap(),
            frequency,
            SplitStrategy::Equal,
            UserId::from("a"),
        )
    }

    fn names(expenses: &[Expense]) -> Vec<&str> {
        expenses.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let list = vec![
            expense("internet", 60.0, Frequency::Monthly),
            expense("Electricity", 90.0, Frequency::Monthly),
            expense("car insurance", 900.0, Frequency::Yearly),
        ];
        let sorted = sort_expenses(&list, SortKey::Name, SortOrder::Asc);
        assert_eq!(names(&sorted), vec!["car insurance", "Electricity", "internet"]);
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        let list = vec![
            expense("Zoo", 1.0, Frequency::Monthly),
            expense("Élan", 1.0, Frequency::Monthly),
            expense("Fuel", 1.0, Frequency::Monthly),
            expense("eau", 1.0, Frequency::Monthly),
        ];
        let sorted = sort_expenses(&list, SortKey::Name, SortOrder::Asc);
        assert_eq!(names(&sorted), vec!["eau", "Élan", "Fuel", "Zoo"]);
    }

    #[test]
    fn test_compare_names_accent_breaks_ties_case_does_not() {
        assert_eq!(compare_names("Rent", "rent"), Ordering::Equal);
        assert_eq!(compare_names("resume", "résumé"), Ordering::Less);
        assert_eq!(compare_names("Résumé", "rim"), Ordering::Less);
        assert_eq!(compare_names("Ångström", "angstrom"), Ordering::Greater);
    }

    #[test]
    fn test_sort_by_normalized_amount() {
        let list = vec![
            expense("Big yearly", 1800.0, Frequency::Yearly),
            expense("Small monthly", 120.0, Frequency::Monthly),
            expense("Tiny", 5.0, Frequency::Monthly),
        ];
        let sorted = sort_expenses(&list, SortKey::Amount, SortOrder::Desc);
        assert_eq!(names(&sorted), vec!["Big yearly", "Small monthly", "Tiny"]);
    }

    #[test]
    fn test_yearly_and_monthly_equivalents_compare_equal() {
        let list = vec![
            expense("Yearly", 1200.0, Frequency::Yearly),
            expense("Monthly", 100.0, Frequency::Monthly),
        ];
        let asc = sort_expenses(&list, SortKey::Amount, SortOrder::Asc);
        let desc = sort_expenses(&list, SortKey::Amount, SortOrder::Desc);
        assert_eq!(names(&asc), vec!["Yearly", "Monthly"]);
        assert_eq!(names(&desc), vec!["Yearly", "Monthly"]);
    }

    #[test]
    fn test_stable_across_repeated_sorts() {
        let list = vec![
            expense("b", 10.0, Frequency::Monthly),
            expense("a", 10.0, Frequency::Monthly),
            expense("c", 5.0, Frequency::Monthly),
            expense("d", 10.0, Frequency::Monthly),
        ];
        let once = sort_expenses(&list, SortKey::Amount, SortOrder::Asc);
        assert_eq!(names(&once), vec!["c", "b", "a", "d"]);
        let twice = sort_expenses(&once, SortKey::Amount, SortOrder::Desc);
        assert_eq!(names(&twice), vec!["b", "a", "d", "c"]);
        let thrice = sort_expenses(&twice, SortKey::Amount, SortOrder::Asc);
        assert_eq!(names(&thrice), vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let list = vec![
            expense("z", 1.0, Frequency::Monthly),
            expense("a", 2.0, Frequency::Monthly),
        ];
        let _ = sort_expenses(&list, SortKey::Name, SortOrder::Asc);
        assert_eq!(names(&list), vec!["z", "a"]);
    }

    #[test]
    fn test_sort_state_select() {
        let mut state = SortState::default();
        assert_eq!(state.key, SortKey::Name);
        assert_eq!(state.order, SortOrder::Asc);

        state.select(SortKey::Name);
        assert_eq!(state.order, SortOrder::Desc);

        state.select(SortKey::Amount);
        assert_eq!(state.key, SortKey::Amount);
        assert_eq!(state.order, SortOrder::Asc);

        state.select(SortKey::Amount);
        assert_eq!(state.order, SortOrder::Desc);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("Amount".parse::<SortKey>().unwrap(), SortKey::Amount);
        assert!("date".parse::<SortKey>().is_err());
    }

    proptest! {
        /// Property: for distinct amounts, descending is ascending reversed.
        #[test]
        fn desc_is_reversed_asc_for_distinct_amounts(
            amounts in prop::collection::btree_set(1u32..1_000_000, 0..20),
        ) {
            let list: Vec<Expense> = amounts
                .iter()
                .rev()
                .enumerate()
                .map(|(i, a)| expense(&format!("e{}", i), f64::from(*a) / 100.0, Frequency::Monthly))
                .collect();
            let mut asc = sort_expenses(&list, SortKey::Amount, SortOrder::Asc);
            asc.reverse();
            let desc = sort_expenses(&list, SortKey::Amount, SortOrder::Desc);
            prop_assert_eq!(asc, desc);
        }
    }
}

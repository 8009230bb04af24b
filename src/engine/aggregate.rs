//! Category aggregation
//!
//! Rolls expenses up into per-category totals, regroups personal expenses by
//! their sub-category, and orders categories for display.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use super::frequency::monthly_amount;
use super::sort::compare_names;
use crate::models::{Expense, ExpenseCategory, PersonalCategoryId, PersonalExpenseCategory};

/// Label used for personal expenses without a (live) sub-category
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Monthly totals for a collection of expenses
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CategoryTotals {
    /// Sum of non-budgeted (fixed) expenses
    pub fixed: f64,
    /// Sum of budgeted expenses
    pub budgeted: f64,
    /// fixed + budgeted
    pub grand: f64,
}

impl CategoryTotals {
    /// Sum monthly amounts into the fixed and budgeted buckets
    pub fn from_expenses<'a, I>(expenses: I) -> Self
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut fixed = 0.0;
        let mut budgeted = 0.0;

        for expense in expenses {
            let monthly = monthly_amount(expense);
            if expense.is_budgeted {
                budgeted += monthly;
            } else {
                fixed += monthly;
            }
        }

        Self {
            fixed,
            budgeted,
            grand: fixed + budgeted,
        }
    }

    /// Totals for one category
    pub fn for_category(category: &ExpenseCategory) -> Self {
        Self::from_expenses(&category.expenses)
    }
}

impl std::ops::Add for CategoryTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            fixed: self.fixed + other.fixed,
            budgeted: self.budgeted + other.budgeted,
            grand: self.grand + other.grand,
        }
    }
}

impl std::iter::Sum for CategoryTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, t| acc + t)
    }
}

/// Grouping key for personal expenses
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum GroupKey {
    Category(PersonalCategoryId),
    Uncategorized,
}

/// Personal expenses sharing one sub-category
#[derive(Debug, Clone, Serialize)]
pub struct PersonalGroup {
    pub key: GroupKey,
    /// Resolved display name
    pub name: String,
    /// Expenses in their original relative order
    pub expenses: Vec<Expense>,
    pub totals: CategoryTotals,
}

impl PersonalGroup {
    /// Whether this is the catch-all bucket
    pub fn is_uncategorized(&self) -> bool {
        self.key == GroupKey::Uncategorized
    }
}

/// Partition personal expenses by sub-category
///
/// Expenses without a sub-category, or pointing at one that no longer
/// exists, land in the Uncategorized group. Groups are ordered by name
/// (case-insensitive) with Uncategorized always last.
pub fn group_personal_expenses(
    expenses: &[Expense],
    categories: &[PersonalExpenseCategory],
) -> Vec<PersonalGroup> {
    let names: HashMap<&PersonalCategoryId, &str> = categories
        .iter()
        .map(|c| (&c.id, c.name.as_str()))
        .collect();

    let mut buckets: BTreeMap<GroupKey, Vec<Expense>> = BTreeMap::new();
    for expense in expenses {
        let key = match &expense.personal_category_id {
            Some(id) if names.contains_key(id) => GroupKey::Category(id.clone()),
            Some(id) => {
                debug!(expense = %expense.id, category = %id, "orphaned personal category reference");
                GroupKey::Uncategorized
            }
            None => GroupKey::Uncategorized,
        };
        buckets.entry(key).or_default().push(expense.clone());
    }

    let mut groups: Vec<PersonalGroup> = buckets
        .into_iter()
        .map(|(key, expenses)| {
            let name = match &key {
                GroupKey::Category(id) => names
                    .get(id)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string()),
                GroupKey::Uncategorized => UNCATEGORIZED_LABEL.to_string(),
            };
            let totals = CategoryTotals::from_expenses(&expenses);
            PersonalGroup {
                key,
                name,
                expenses,
                totals,
            }
        })
        .collect();

    groups.sort_by(|a, b| match (a.is_uncategorized(), b.is_uncategorized()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => compare_names(&a.name, &b.name),
    });

    groups
}

/// Order top-level categories for display
///
/// The shared household category always comes first; the rest follow by
/// name (case-insensitive), ties broken by id.
pub fn order_categories(categories: &[ExpenseCategory]) -> Vec<&ExpenseCategory> {
    let mut ordered: Vec<&ExpenseCategory> = categories.iter().collect();
    ordered.sort_by(|a, b| match (a.id.is_shared(), b.id.is_shared()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_names(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)),
    });
    ordered
}

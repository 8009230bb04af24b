//! Household summary report
//!
//! Rolls the whole household up into one view: categories in display order
//! with fixed/budgeted totals and personal sub-groups, per-member balances,
//! and household grand totals. All figures are monthly.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::display::CollapseState;
use crate::engine::{
    compute_monthly_shares, group_personal_expenses, monthly_amount, order_categories,
    CategoryTotals, SortState,
};
use crate::error::LedgerResult;
use crate::models::{
    format_currency, CategoryId, Expense, ExpenseId, Frequency, SplitType, UserId,
};
use crate::storage::{HouseholdData, Storage};

/// One expense line
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRow {
    pub id: ExpenseId,
    pub name: String,
    /// Stated amount per `frequency`
    pub amount: f64,
    pub frequency: Frequency,
    pub monthly: f64,
    pub split: SplitType,
    pub is_budgeted: bool,
    pub paid_by: String,
}

/// Personal expenses under one sub-category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalGroupRow {
    pub name: String,
    pub is_uncategorized: bool,
    pub expenses: Vec<ExpenseRow>,
    pub totals: CategoryTotals,
}

/// One top-level category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    /// Shared expenses, sorted
    pub shared_expenses: Vec<ExpenseRow>,
    /// Personal expenses grouped by sub-category
    pub personal_groups: Vec<PersonalGroupRow>,
    pub totals: CategoryTotals,
}

impl CategoryRow {
    /// Number of expenses in this category
    pub fn expense_count(&self) -> usize {
        self.shared_expenses.len()
            + self
                .personal_groups
                .iter()
                .map(|g| g.expenses.len())
                .sum::<usize>()
    }
}

/// Monthly position of one member
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalance {
    pub id: UserId,
    pub name: String,
    pub color: String,
    pub gross_income: f64,
    pub net_income: f64,
    /// Owed share of shared expenses
    pub shared_owed: f64,
    /// Personal expenses owned by this member
    pub personal_total: f64,
    /// Net income minus everything owed
    pub remaining: f64,
}

/// Household summary report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdSummary {
    pub categories: Vec<CategoryRow>,
    pub members: Vec<MemberBalance>,
    pub totals: CategoryTotals,
    pub shared_total: f64,
    pub personal_total: f64,
}

impl HouseholdSummary {
    /// Generate the summary from storage
    pub fn generate(storage: &Storage, sort: SortState) -> LedgerResult<Self> {
        let data = storage.household.snapshot()?;
        Ok(Self::from_data(&data, sort))
    }

    /// Build the summary from an in-memory household snapshot
    pub fn from_data(data: &HouseholdData, sort: SortState) -> Self {
        let member_names: BTreeMap<&UserId, &str> =
            data.users.iter().map(|u| (&u.id, u.name.as_str())).collect();
        let row = |e: &Expense| expense_row(e, &member_names);

        let categories: Vec<CategoryRow> = order_categories(&data.categories)
            .into_iter()
            .map(|category| {
                let (shared, personal): (Vec<Expense>, Vec<Expense>) = category
                    .expenses
                    .iter()
                    .cloned()
                    .partition(|e| e.is_shared());

                let personal_groups = group_personal_expenses(&personal, &data.personal_categories)
                    .into_iter()
                    .map(|group| PersonalGroupRow {
                        is_uncategorized: group.is_uncategorized(),
                        expenses: sort.apply(&group.expenses).iter().map(&row).collect(),
                        name: group.name,
                        totals: group.totals,
                    })
                    .collect();

                CategoryRow {
                    id: category.id.clone(),
                    name: category.name.clone(),
                    shared_expenses: sort.apply(&shared).iter().map(&row).collect(),
                    personal_groups,
                    totals: CategoryTotals::for_category(category),
                }
            })
            .collect();

        let totals: CategoryTotals = categories.iter().map(|c| c.totals).sum();

        let mut shared_owed: BTreeMap<UserId, f64> = BTreeMap::new();
        let mut personal_owed: BTreeMap<UserId, f64> = BTreeMap::new();
        let mut shared_total = 0.0;
        let mut personal_total = 0.0;

        for expense in data.categories.iter().flat_map(|c| &c.expenses) {
            let (bucket, total) = if expense.is_shared() {
                (&mut shared_owed, &mut shared_total)
            } else {
                (&mut personal_owed, &mut personal_total)
            };
            *total += monthly_amount(expense);

            match compute_monthly_shares(expense, &data.users) {
                Ok(shares) => {
                    for (user, amount) in shares {
                        *bucket.entry(user).or_insert(0.0) += amount;
                    }
                }
                Err(e) => warn!(expense = %expense.id, error = %e, "expense left out of member balances"),
            }
        }

        let members = data
            .users
            .iter()
            .map(|user| {
                let shared = shared_owed.get(&user.id).copied().unwrap_or(0.0);
                let personal = personal_owed.get(&user.id).copied().unwrap_or(0.0);
                let net_income = user.net_monthly_income();
                MemberBalance {
                    id: user.id.clone(),
                    name: user.name.clone(),
                    color: user.color.clone(),
                    gross_income: user.monthly_income,
                    net_income,
                    shared_owed: shared,
                    personal_total: personal,
                    remaining: net_income - shared - personal,
                }
            })
            .collect();

        Self {
            categories,
            members,
            totals,
            shared_total,
            personal_total,
        }
    }

    /// Format the report for terminal display
    ///
    /// Collapsed categories show only their header and totals.
    pub fn format_terminal(&self, collapse: &CollapseState, symbol: &str) -> String {
        let money = |v: f64| format_currency(v, symbol);
        let mut output = String::new();

        output.push_str("Household Summary (monthly)\n");
        output.push_str(&"=".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<40} {:>11} {:>11} {:>11}\n",
            "Category", "Fixed", "Budgeted", "Total"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');

        for category in &self.categories {
            let collapsed = collapse.is_collapsed(&category.id);
            let marker = if collapsed { "+" } else { "-" };
            output.push_str(&format!(
                "{} {:<38} {:>11} {:>11} {:>11}\n",
                marker,
                truncate(&category.name, 38),
                money(category.totals.fixed),
                money(category.totals.budgeted),
                money(category.totals.grand)
            ));

            if collapsed {
                if category.expense_count() > 0 {
                    output.push_str(&format!(
                        "    ({} expense(s) hidden)\n",
                        category.expense_count()
                    ));
                }
                continue;
            }

            for expense in &category.shared_expenses {
                output.push_str(&format_expense_line(expense, "    ", &money));
            }

            for group in &category.personal_groups {
                output.push_str(&format!(
                    "    {:<36} {:>11} {:>11} {:>11}\n",
                    format!("[{}]", truncate(&group.name, 34)),
                    money(group.totals.fixed),
                    money(group.totals.budgeted),
                    money(group.totals.grand)
                ));
                for expense in &group.expenses {
                    output.push_str(&format_expense_line(expense, "      ", &money));
                }
            }
        }

        output.push_str(&"-".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<40} {:>11} {:>11} {:>11}\n",
            "HOUSEHOLD TOTAL",
            money(self.totals.fixed),
            money(self.totals.budgeted),
            money(self.totals.grand)
        ));
        output.push_str(&format!(
            "  Shared: {}   Personal: {}\n",
            money(self.shared_total),
            money(self.personal_total)
        ));

        if !self.members.is_empty() {
            output.push('\n');
            output.push_str(&format!(
                "{:<20} {:>11} {:>11} {:>11} {:>11} {:>11}\n",
                "Member", "Gross", "Net", "Shared", "Personal", "Remaining"
            ));
            output.push_str(&"-".repeat(78));
            output.push('\n');
            for member in &self.members {
                let remaining = if member.remaining < 0.0 {
                    format!("{} *", money(member.remaining))
                } else {
                    money(member.remaining)
                };
                output.push_str(&format!(
                    "{:<20} {:>11} {:>11} {:>11} {:>11} {:>11}\n",
                    truncate(&member.name, 20),
                    money(member.gross_income),
                    money(member.net_income),
                    money(member.shared_owed),
                    money(member.personal_total),
                    remaining
                ));
            }
            if self.members.iter().any(|m| m.remaining < 0.0) {
                output.push_str("\n* = Over budget\n");
            }
        }

        output
    }
}

fn expense_row(expense: &Expense, member_names: &BTreeMap<&UserId, &str>) -> ExpenseRow {
    ExpenseRow {
        id: expense.id.clone(),
        name: expense.name.clone(),
        amount: expense.amount.value(),
        frequency: expense.frequency,
        monthly: monthly_amount(expense),
        split: expense.split_type(),
        is_budgeted: expense.is_budgeted,
        paid_by: member_names
            .get(&expense.paid_by)
            .map(|n| n.to_string())
            .unwrap_or_else(|| expense.paid_by.short().to_string()),
    }
}

fn format_expense_line(expense: &ExpenseRow, indent: &str, money: &dyn Fn(f64) -> String) -> String {
    let width = 40usize.saturating_sub(indent.len());
    let label = if expense.is_budgeted {
        format!("{} (b)", truncate(&expense.name, width.saturating_sub(4)))
    } else {
        truncate(&expense.name, width)
    };
    let (fixed, budgeted) = if expense.is_budgeted {
        (String::new(), money(expense.monthly))
    } else {
        (money(expense.monthly), String::new())
    };

    let mut note = expense.split.to_string();
    if expense.frequency == Frequency::Yearly {
        note.push_str(&format!(", {}/yr", money(expense.amount)));
    }

    format!(
        "{}{:<w$} {:>11} {:>11} {:>11}  {}\n",
        indent,
        label,
        fixed,
        budgeted,
        money(expense.monthly),
        note,
        w = width
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SortKey, SortOrder};
    use crate::models::{
        Amount, ExpenseCategory, PersonalCategoryId, PersonalExpenseCategory, ShareMap,
        SplitStrategy, User,
    };

    fn user(id: &str, income: f64) -> User {
        User {
            id: UserId::from(id),
            name: id.to_uppercase(),
            monthly_income: income,
            color: "#4e79a7".into(),
            tax_rate: 0.25,
        }
    }

    fn expense(name: &str, amount: f64, frequency: Frequency, split: SplitStrategy) -> Expense {
        Expense::new(name, Amount::new(amount).unwrap(), frequency, split, UserId::from("a"))
    }

    fn fixed(owner: &str) -> SplitStrategy {
        SplitStrategy::Fixed {
            owner: UserId::from(owner),
        }
    }

    fn household() -> HouseholdData {
        let mut shared = ExpenseCategory::shared();
        let mut shares = ShareMap::new();
        shares.insert(UserId::from("a"), 0.75);
        shares.insert(UserId::from("b"), 0.25);
        shared.expenses = vec![
            expense("Rent", 1000.0, Frequency::Monthly, SplitStrategy::Percentage { shares }),
            expense("Insurance", 1200.0, Frequency::Yearly, SplitStrategy::Equal),
            expense("Groceries", 400.0, Frequency::Monthly, SplitStrategy::Equal).budgeted(true),
        ];

        let streaming = PersonalExpenseCategory::with_id(PersonalCategoryId::from("s"), "Streaming");
        let hobbies = PersonalExpenseCategory::with_id(PersonalCategoryId::from("h"), "Hobbies");

        let mut ana = ExpenseCategory::with_id(CategoryId::from("cat-a"), "ana");
        ana.expenses = vec![
            expense("Netflix", 15.0, Frequency::Monthly, fixed("a"))
                .in_personal_category(streaming.id.clone()),
            expense("Paint", 30.0, Frequency::Monthly, fixed("a"))
                .in_personal_category(hobbies.id.clone())
                .budgeted(true),
            expense("Gym", 45.0, Frequency::Monthly, fixed("a")),
            expense("Old", 5.0, Frequency::Monthly, fixed("a"))
                .in_personal_category(PersonalCategoryId::from("deleted")),
        ];

        let empty = ExpenseCategory::with_id(CategoryId::from("cat-b"), "Ben");

        HouseholdData {
            users: vec![user("a", 3000.0), user("b", 1000.0)],
            categories: vec![empty, ana, shared],
            personal_categories: vec![streaming, hobbies],
            next_color_slot: 2,
        }
    }

    #[test]
    fn test_category_order_and_totals() {
        let summary = HouseholdSummary::from_data(&household(), SortState::default());

        let names: Vec<_> = summary.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Shared", "ana", "Ben"]);

        let shared = &summary.categories[0];
        assert!((shared.totals.fixed - 1100.0).abs() < 1e-9);
        assert!((shared.totals.budgeted - 400.0).abs() < 1e-9);
        assert_eq!(summary.categories[2].totals, CategoryTotals::default());

        assert!((summary.totals.grand - 1595.0).abs() < 1e-9);
        assert!((summary.shared_total - 1500.0).abs() < 1e-9);
        assert!((summary.personal_total - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_personal_groups() {
        let summary = HouseholdSummary::from_data(&household(), SortState::default());
        let ana = &summary.categories[1];

        assert!(ana.shared_expenses.is_empty());
        let groups: Vec<_> = ana.personal_groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(groups, vec!["Hobbies", "Streaming", "Uncategorized"]);

        let uncategorized = &ana.personal_groups[2];
        let names: Vec<_> = uncategorized.expenses.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Gym", "Old"]);
        assert_eq!(ana.expense_count(), 4);
    }

    #[test]
    fn test_sort_applies_within_sections() {
        let sort = SortState {
            key: SortKey::Amount,
            order: SortOrder::Desc,
        };
        let summary = HouseholdSummary::from_data(&household(), sort);
        let names: Vec<_> = summary.categories[0]
            .shared_expenses
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Rent", "Groceries", "Insurance"]);
    }

    #[test]
    fn test_member_balances() {
        let summary = HouseholdSummary::from_data(&household(), SortState::default());
        let ana = &summary.members[0];
        let ben = &summary.members[1];

        // rent 750 + insurance 50 + groceries 200
        assert!((ana.shared_owed - 1000.0).abs() < 1e-9);
        assert!((ana.personal_total - 95.0).abs() < 1e-9);
        assert!((ana.net_income - 2250.0).abs() < 1e-9);
        assert!((ana.remaining - 1155.0).abs() < 1e-9);

        // rent 250 + insurance 50 + groceries 200
        assert!((ben.shared_owed - 500.0).abs() < 1e-9);
        assert_eq!(ben.personal_total, 0.0);
        assert!((ben.remaining - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_terminal_format_respects_collapse() {
        let summary = HouseholdSummary::from_data(&household(), SortState::default());

        let expanded = summary.format_terminal(&CollapseState::new(), "$");
        assert!(expanded.contains("Household Summary"));
        assert!(expanded.contains("Netflix"));
        assert!(expanded.contains("[Uncategorized]"));
        assert!(expanded.contains("equal, $1200.00/yr"));

        let mut collapse = CollapseState::new();
        collapse.set(&CategoryId::from("cat-a"), true);
        let collapsed = summary.format_terminal(&collapse, "$");
        assert!(!collapsed.contains("Netflix"));
        assert!(collapsed.contains("(4 expense(s) hidden)"));
        assert!(collapsed.contains("HOUSEHOLD TOTAL"));
        assert!(collapsed.contains("$1595.00"));
    }
}

//! Category display formatting

use crate::engine::{order_categories, CategoryTotals};
use crate::models::{format_currency, ExpenseCategory, PersonalExpenseCategory};

use super::truncate;

/// Format expense categories in display order with their monthly totals
pub fn format_category_list(categories: &[ExpenseCategory], symbol: &str) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'ledger init' to create the shared category."
            .to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<28}  {:>8}  {:>12}  {:>12}  {}\n",
        "Name", "Expenses", "Fixed", "Budgeted", "Flags"
    ));
    output.push_str(&format!(
        "{:-<28}  {:->8}  {:->12}  {:->12}  {:-<10}\n",
        "", "", "", "", ""
    ));

    for category in order_categories(categories) {
        let totals = CategoryTotals::for_category(category);
        let mut flags = Vec::new();
        if category.id.is_shared() {
            flags.push("shared");
        }
        if category.collapsed {
            flags.push("collapsed");
        }

        output.push_str(&format!(
            "{:<28}  {:>8}  {:>12}  {:>12}  {}\n",
            truncate(&category.name, 28),
            category.expenses.len(),
            format_currency(totals.fixed, symbol),
            format_currency(totals.budgeted, symbol),
            flags.join(", ")
        ));
    }

    output
}

/// Format personal categories
pub fn format_personal_category_list(categories: &[PersonalExpenseCategory]) -> String {
    if categories.is_empty() {
        return "No personal categories found.".to_string();
    }

    let mut sorted: Vec<&PersonalExpenseCategory> = categories.iter().collect();
    sorted.sort_by(|a, b| crate::engine::compare_names(&a.name, &b.name));

    let mut output = String::from("Personal categories:\n");
    for category in sorted {
        output.push_str(&format!("  {} ({})\n", category.name, category.id.short()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Expense, Frequency, SplitStrategy, UserId};

    #[test]
    fn test_category_list_orders_shared_first() {
        let mut shared = ExpenseCategory::shared();
        shared.collapsed = true;
        shared.expenses.push(
            Expense::new(
                "Rent",
                Amount::new(1000.0).unwrap(),
                Frequency::Monthly,
                SplitStrategy::Equal,
                UserId::from("a"),
            ),
        );
        let categories = vec![ExpenseCategory::new("groceries"), shared];

        let output = format_category_list(&categories, "$");
        let shared_pos = output.find("Shared").unwrap();
        let groceries_pos = output.find("groceries").unwrap();
        assert!(shared_pos < groceries_pos);
        assert!(output.contains("shared, collapsed"));
        assert!(output.contains("$1000.00"));
    }

    #[test]
    fn test_personal_list_sorted() {
        let categories = vec![
            PersonalExpenseCategory::new("streaming"),
            PersonalExpenseCategory::new("Hobbies"),
        ];
        let output = format_personal_category_list(&categories);
        assert!(output.find("Hobbies").unwrap() < output.find("streaming").unwrap());
    }
}

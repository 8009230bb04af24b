//! Expense display formatting

use std::collections::HashMap;

use crate::engine::{format_amount_with_frequency, monthly_amount};
use crate::models::{format_currency, Expense, SplitStrategy, User, UserId};
use crate::services::ExpenseShares;

use super::truncate;

fn member_name<'a>(names: &HashMap<&UserId, &'a str>, id: &'a UserId) -> &'a str {
    names.get(id).copied().unwrap_or_else(|| id.short())
}

fn name_lookup(users: &[User]) -> HashMap<&UserId, &str> {
    users.iter().map(|u| (&u.id, u.name.as_str())).collect()
}

fn split_label(expense: &Expense, names: &HashMap<&UserId, &str>) -> String {
    match &expense.split {
        SplitStrategy::Equal => "equal".to_string(),
        SplitStrategy::Percentage { .. } => "percentage".to_string(),
        SplitStrategy::Fixed { owner } => format!("fixed: {}", member_name(names, owner)),
    }
}

/// Format expenses as a table, in the order given
pub fn format_expense_list(expenses: &[Expense], users: &[User], symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let names = name_lookup(users);
    let mut output = String::new();
    output.push_str(&format!(
        "{:<24}  {:>16}  {:>11}  {:<16}  {:<3}  {}\n",
        "Name", "Amount", "Monthly", "Split", "B", "ID"
    ));
    output.push_str(&"-".repeat(84));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format!(
            "{:<24}  {:>16}  {:>11}  {:<16}  {:<3}  {}\n",
            truncate(&expense.name, 24),
            format_amount_with_frequency(expense, symbol),
            format_currency(monthly_amount(expense), symbol),
            truncate(&split_label(expense, &names), 16),
            if expense.is_budgeted { "*" } else { "" },
            expense.id.short()
        ));
    }

    output.push_str("\nB: * = budgeted\n");
    output
}

/// Format a single expense's details
pub fn format_expense_details(
    expense: &Expense,
    category_name: &str,
    personal_category_name: Option<&str>,
    users: &[User],
    symbol: &str,
) -> String {
    let names = name_lookup(users);
    let mut output = String::new();

    output.push_str(&format!("Expense:   {}\n", expense.name));
    output.push_str(&format!("ID:        {}\n", expense.id));
    output.push_str(&format!("Category:  {}\n", category_name));
    if let Some(id) = &expense.personal_category_id {
        output.push_str(&format!(
            "Group:     {}\n",
            personal_category_name.unwrap_or_else(|| id.short())
        ));
    }
    output.push_str(&format!(
        "Amount:    {}\n",
        format_amount_with_frequency(expense, symbol)
    ));
    output.push_str(&format!(
        "Monthly:   {}\n",
        format_currency(monthly_amount(expense), symbol)
    ));
    output.push_str(&format!("Split:     {}\n", split_label(expense, &names)));
    output.push_str(&format!(
        "Paid by:   {}\n",
        member_name(&names, &expense.paid_by)
    ));
    output.push_str(&format!(
        "Type:      {}\n",
        if expense.is_budgeted { "budgeted" } else { "fixed" }
    ));

    if let SplitStrategy::Percentage { shares } = &expense.split {
        output.push_str("\nShares:\n");
        for (id, fraction) in shares {
            output.push_str(&format!(
                "  {:<20} {:>6.2}%\n",
                member_name(&names, id),
                fraction * 100.0
            ));
        }
    }

    output
}

/// Format per-member shares of an expense
pub fn format_shares(shares: &ExpenseShares, users: &[User], symbol: &str) -> String {
    let names = name_lookup(users);
    let expense = &shares.expense;
    let mut output = String::new();

    output.push_str(&format!(
        "{} ({}, {} split)\n",
        expense.name,
        format_amount_with_frequency(expense, symbol),
        expense.split_type()
    ));
    output.push_str(&format!("{:<20}  {:>12}  {:>12}\n", "Member", "Share", "Monthly"));
    output.push_str(&"-".repeat(48));
    output.push('\n');

    for (id, stated) in &shares.stated {
        let monthly = shares.monthly.get(id).copied().unwrap_or(0.0);
        output.push_str(&format!(
            "{:<20}  {:>12}  {:>12}\n",
            truncate(member_name(&names, id), 20),
            format_currency(*stated, symbol),
            format_currency(monthly, symbol)
        ));
    }

    output
}

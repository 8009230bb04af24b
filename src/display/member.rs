//! Member display formatting

use crate::models::{format_currency, User};

use super::truncate;

/// Format members as a table
pub fn format_member_list(users: &[User], symbol: &str) -> String {
    if users.is_empty() {
        return "No members yet.\n\nUse 'ledger member approve <NAME>' to add one.".to_string();
    }

    let name_width = users
        .iter()
        .map(|u| u.name.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 24);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:>6}  {:>12}  {:<8}  {}\n",
        "Name",
        "Income",
        "Tax",
        "Net",
        "Color",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->6}  {:->12}  {:-<8}  {:-<8}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for user in users {
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>5.1}%  {:>12}  {:<8}  {}\n",
            truncate(&user.name, name_width),
            format_currency(user.monthly_income, symbol),
            user.tax_rate * 100.0,
            format_currency(user.net_monthly_income(), symbol),
            user.color,
            user.id.short(),
            name_width = name_width,
        ));
    }

    output
}

/// Format a single member's details
pub fn format_member_details(user: &User, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Member:  {}\n", user.name));
    output.push_str(&format!("ID:      {}\n", user.id));
    output.push_str(&format!(
        "Income:  {}/month\n",
        format_currency(user.monthly_income, symbol)
    ));
    output.push_str(&format!("Tax:     {:.1}%\n", user.tax_rate * 100.0));
    output.push_str(&format!(
        "Net:     {}/month\n",
        format_currency(user.net_monthly_income(), symbol)
    ));
    output.push_str(&format!("Color:   {}\n", user.color));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        assert!(format_member_list(&[], "$").contains("No members"));
    }

    #[test]
    fn test_list_and_details() {
        let user = User::new("Ana", "#4e79a7").with_income(3000.0);
        let list = format_member_list(std::slice::from_ref(&user), "$");
        assert!(list.contains("Ana"));
        assert!(list.contains("$3000.00"));
        assert!(list.contains("32.0%"));
        assert!(list.contains("$2040.00"));

        let details = format_member_details(&user, "€");
        assert!(details.contains("Income:  €3000.00/month"));
        assert!(details.contains("#4e79a7"));
    }
}

//! CSV export
//!
//! One row per expense with its monthly figure, in summary order.

use std::io::Write;

use serde::Serialize;

use crate::engine::SortState;
use crate::error::{LedgerError, LedgerResult};
use crate::reports::{ExpenseRow, HouseholdSummary};
use crate::storage::Storage;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Expense")]
    expense: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Frequency")]
    frequency: String,
    #[serde(rename = "Monthly")]
    monthly: String,
    #[serde(rename = "Split")]
    split: String,
    #[serde(rename = "Budgeted")]
    budgeted: bool,
    #[serde(rename = "Paid By")]
    paid_by: &'a str,
}

impl<'a> CsvRow<'a> {
    fn new(category: &'a str, group: &'a str, row: &'a ExpenseRow) -> Self {
        Self {
            category,
            group,
            expense: &row.name,
            amount: format!("{:.2}", row.amount),
            frequency: row.frequency.to_string(),
            monthly: format!("{:.2}", row.monthly),
            split: row.split.to_string(),
            budgeted: row.is_budgeted,
            paid_by: &row.paid_by,
        }
    }
}

/// Export all expenses to CSV
pub fn export_expenses_csv<W: Write>(storage: &Storage, sort: SortState, writer: W) -> LedgerResult<()> {
    let summary = HouseholdSummary::generate(storage, sort)?;
    write_summary_csv(&summary, writer)
}

/// Write the expense rows of a summary as CSV
pub fn write_summary_csv<W: Write>(summary: &HouseholdSummary, writer: W) -> LedgerResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for category in &summary.categories {
        for row in &category.shared_expenses {
            wtr.serialize(CsvRow::new(&category.name, "", row))?;
        }
        for group in &category.personal_groups {
            for row in &group.expenses {
                wtr.serialize(CsvRow::new(&category.name, &group.name, row))?;
            }
        }
    }

    wtr.flush()
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::seeded_storage;

    #[test]
    fn test_csv_export() {
        let (_temp_dir, storage) = seeded_storage();
        let mut output = Vec::new();
        export_expenses_csv(&storage, SortState::default(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Category,Group,Expense,Amount,Frequency,Monthly,Split,Budgeted,Paid By"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Shared,,Insurance,1200.00,Yearly,100.00,equal,false,Ana"));
        assert!(lines[2].starts_with("Shared,,Rent,"));
    }

    #[test]
    fn test_empty_household_writes_nothing() {
        let summary = HouseholdSummary::from_data(&Default::default(), SortState::default());
        let mut output = Vec::new();
        write_summary_csv(&summary, &mut output).unwrap();
        assert!(output.is_empty());
    }
}

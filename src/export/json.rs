//! JSON export
//!
//! Exports the household snapshot together with the computed summary.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::SortState;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ExpenseCategory, PersonalExpenseCategory, User};
use crate::reports::HouseholdSummary;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full household export
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub users: Vec<User>,
    pub categories: Vec<ExpenseCategory>,
    pub personal_categories: Vec<PersonalExpenseCategory>,
    pub summary: HouseholdSummary,
}

impl LedgerExport {
    /// Build an export from storage
    pub fn from_storage(storage: &Storage, sort: SortState) -> LedgerResult<Self> {
        let data = storage.household.snapshot()?;
        let summary = HouseholdSummary::from_data(&data, sort);

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            users: data.users,
            categories: data.categories,
            personal_categories: data.personal_categories,
            summary,
        })
    }

    /// Number of expenses across all categories
    pub fn expense_count(&self) -> usize {
        self.categories.iter().map(|c| c.expenses.len()).sum()
    }
}

/// Export the household as pretty-printed JSON
pub fn export_json<W: Write>(storage: &Storage, sort: SortState, writer: &mut W) -> LedgerResult<()> {
    let export = LedgerExport::from_storage(storage, sort)?;
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::seeded_storage;

    #[test]
    fn test_json_export() {
        let (_temp_dir, storage) = seeded_storage();
        let mut output = Vec::new();
        export_json(&storage, SortState::default(), &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["schemaVersion"], EXPORT_SCHEMA_VERSION);
        assert_eq!(value["users"].as_array().unwrap().len(), 2);
        assert_eq!(value["summary"]["categories"][0]["name"], "Shared");
        assert_eq!(value["categories"][0]["expenses"][0]["split"]["type"], "equal");
    }

    #[test]
    fn test_expense_count() {
        let (_temp_dir, storage) = seeded_storage();
        let export = LedgerExport::from_storage(&storage, SortState::default()).unwrap();
        assert_eq!(export.expense_count(), 2);
    }
}

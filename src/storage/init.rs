//! Storage initialization
//!
//! Handles first-run setup: the household file is created with the shared
//! category in place so expenses can be added straight away.

use tracing::info;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::ExpenseCategory;

use super::file_io::write_json_atomic;
use super::household::HouseholdData;

/// Initialize storage for a fresh installation
///
/// Returns `true` if a new household file was written, `false` if one
/// already existed and was left untouched.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<bool, LedgerError> {
    paths.ensure_directories()?;

    if paths.household_file().exists() {
        return Ok(false);
    }

    let data = HouseholdData {
        categories: vec![ExpenseCategory::shared()],
        ..HouseholdData::default()
    };
    write_json_atomic(paths.household_file(), &data)?;
    info!(path = %paths.household_file().display(), "initialized household storage");

    Ok(true)
}

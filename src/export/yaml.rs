//! YAML export
//!
//! Same content as the JSON export, for human reading.

use std::io::Write;

use crate::engine::SortState;
use crate::error::{LedgerError, LedgerResult};
use crate::export::json::LedgerExport;
use crate::storage::Storage;

/// Export the household as YAML
pub fn export_yaml<W: Write>(storage: &Storage, sort: SortState, writer: &mut W) -> LedgerResult<()> {
    let export = LedgerExport::from_storage(storage, sort)?;

    writeln!(writer, "# Household ledger export")
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| LedgerError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::seeded_storage;

    #[test]
    fn test_yaml_export() {
        let (_temp_dir, storage) = seeded_storage();
        let mut output = Vec::new();
        export_yaml(&storage, SortState::default(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("# Household ledger export"));
        assert!(text.contains("schemaVersion:"));
        assert!(text.contains("name: Rent"));

        let parsed: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed["users"].as_sequence().unwrap().len(), 2);
    }
}

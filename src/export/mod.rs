//! Export module for the household ledger
//!
//! - JSON: machine-readable snapshot plus computed summary
//! - YAML: the same content, human-readable
//! - CSV: one row per expense (spreadsheet-compatible)

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_expenses_csv, write_summary_csv};
pub use json::{export_json, LedgerExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_yaml;

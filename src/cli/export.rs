//! Export CLI command

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::engine::SortState;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_expenses_csv, export_json, export_yaml};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Full snapshot and summary as JSON
    Json,
    /// Full snapshot and summary as YAML
    Yaml,
    /// One row per expense
    Csv,
}

/// Options for exporting the household
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> LedgerResult<()> {
    let sort = SortState::new(settings.default_sort);

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                LedgerError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(storage, sort, args.format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| LedgerError::Export(e.to_string()))?;
            eprintln!("Exported household to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_export(storage, sort, args.format, &mut handle)?;
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    storage: &Storage,
    sort: SortState,
    format: ExportFormat,
    writer: &mut W,
) -> LedgerResult<()> {
    match format {
        ExportFormat::Json => export_json(storage, sort, writer),
        ExportFormat::Yaml => export_yaml(storage, sort, writer),
        ExportFormat::Csv => export_expenses_csv(storage, sort, writer),
    }
}

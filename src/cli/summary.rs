//! Summary CLI command

use clap::Args;

use crate::config::Settings;
use crate::display::CollapseState;
use crate::engine::SortKey;
use crate::error::LedgerResult;
use crate::reports::HouseholdSummary;
use crate::services::CategoryService;
use crate::storage::Storage;

use super::expense::sort_state;

/// Options for the household summary
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Ignore saved collapse flags and show every category
    #[arg(long)]
    pub expand_all: bool,

    /// Flip a category's collapse state for this run only (repeatable)
    #[arg(long = "toggle", value_name = "CATEGORY")]
    pub toggle: Vec<String>,

    /// Sort key within each section; defaults to the configured sort
    #[arg(short, long)]
    pub sort: Option<SortKey>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

/// Print the household summary
pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    args: SummaryArgs,
) -> LedgerResult<()> {
    let categories = CategoryService::new(storage);

    let mut collapse = CollapseState::from_categories(&categories.list()?);
    if args.expand_all {
        collapse.expand_all();
    }
    for name in &args.toggle {
        let category = categories.resolve(name)?;
        collapse.toggle(&category.id);
    }

    let sort = sort_state(args.sort.unwrap_or(settings.default_sort), args.desc);
    let summary = HouseholdSummary::generate(storage, sort)?;
    print!(
        "{}",
        summary.format_terminal(&collapse, &settings.currency_symbol)
    );

    Ok(())
}

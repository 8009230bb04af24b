//! Category CLI commands
//!
//! Implements CLI commands for top-level expense categories.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_category_list;
use crate::error::LedgerResult;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories with their monthly totals
    List,

    /// Create a new category
    Create {
        /// Category name
        name: String,
    },

    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },

    /// Delete a category
    Delete {
        /// Category name or ID
        category: String,
        /// Also delete the expenses it holds
        #[arg(long)]
        force: bool,
    },

    /// Collapse or expand a category in the summary
    Toggle {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> LedgerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            print!(
                "{}",
                format_category_list(&categories, &settings.currency_symbol)
            );
        }

        CategoryCommands::Create { name } => {
            let category = service.create(&name)?;
            println!("Created category: {}", category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Rename { category, name } => {
            let cat = service.resolve(&category)?;
            let renamed = service.rename(&cat.id, &name)?;
            println!("Renamed category: {} -> {}", cat.name, renamed.name);
        }

        CategoryCommands::Delete { category, force } => {
            let cat = service.resolve(&category)?;
            let removed = service.delete(&cat.id, force)?;
            if removed.expenses.is_empty() {
                println!("Deleted category: {}", removed.name);
            } else {
                println!(
                    "Deleted category: {} ({} expense(s) removed)",
                    removed.name,
                    removed.expenses.len()
                );
            }
        }

        CategoryCommands::Toggle { category } => {
            let cat = service.resolve(&category)?;
            let collapsed = service.toggle_collapsed(&cat.id)?;
            let state = if collapsed { "collapsed" } else { "expanded" };
            println!("Category '{}' is now {}", cat.name, state);
        }
    }

    Ok(())
}

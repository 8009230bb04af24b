//! Personal category CLI commands

use clap::Subcommand;

use crate::display::format_personal_category_list;
use crate::error::LedgerResult;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Personal category subcommands
#[derive(Subcommand)]
pub enum PersonalCommands {
    /// List personal categories
    List,

    /// Create a personal category
    Create {
        /// Category name
        name: String,
    },

    /// Rename a personal category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },

    /// Delete a personal category (its expenses become uncategorized)
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a personal category command
pub fn handle_personal_command(storage: &Storage, cmd: PersonalCommands) -> LedgerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        PersonalCommands::List => {
            let categories = service.list_personal()?;
            println!("{}", format_personal_category_list(&categories));
        }

        PersonalCommands::Create { name } => {
            let category = service.create_personal(&name)?;
            println!("Created personal category: {}", category.name);
            println!("  ID: {}", category.id);
        }

        PersonalCommands::Rename { category, name } => {
            let cat = service.resolve_personal(&category)?;
            let renamed = service.rename_personal(&cat.id, &name)?;
            println!("Renamed personal category: {} -> {}", cat.name, renamed.name);
        }

        PersonalCommands::Delete { category } => {
            let cat = service.resolve_personal(&category)?;
            service.delete_personal(&cat.id)?;
            println!("Deleted personal category: {}", cat.name);
        }
    }

    Ok(())
}

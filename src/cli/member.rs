//! Member CLI commands
//!
//! Approving members and editing the income figures splits are weighted by.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_member_details, format_member_list};
use crate::error::LedgerResult;
use crate::services::{MemberService, MemberUpdate};
use crate::storage::Storage;

/// Member subcommands
#[derive(Subcommand)]
pub enum MemberCommands {
    /// Approve a new household member
    Approve {
        /// Member name
        name: String,
    },

    /// List all members
    List,

    /// Show member details
    Show {
        /// Member name or ID
        member: String,
    },

    /// Edit a member
    Edit {
        /// Member name or ID
        member: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// Gross monthly income (e.g., "3000" or "$3,000.00")
        #[arg(short, long)]
        income: Option<String>,
        /// Tax rate as a fraction (0.25) or percentage (25%)
        #[arg(short, long)]
        tax_rate: Option<String>,
    },
}

/// Handle a member command
pub fn handle_member_command(
    storage: &Storage,
    settings: &Settings,
    cmd: MemberCommands,
) -> LedgerResult<()> {
    let service = MemberService::new(storage, settings);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        MemberCommands::Approve { name } => {
            let user = service.approve(&name)?;
            println!("Approved member: {}", user.name);
            println!("  Color: {}", user.color);
            println!("  ID: {}", user.id);
            println!();
            println!(
                "Set their income with 'ledger member edit \"{}\" --income <AMOUNT>'.",
                user.name
            );
        }

        MemberCommands::List => {
            let users = service.list()?;
            print!("{}", format_member_list(&users, symbol));
        }

        MemberCommands::Show { member } => {
            let user = service.resolve(&member)?;
            print!("{}", format_member_details(&user, symbol));
        }

        MemberCommands::Edit {
            member,
            name,
            income,
            tax_rate,
        } => {
            let user = service.resolve(&member)?;

            if name.is_none() && income.is_none() && tax_rate.is_none() {
                println!("No changes specified. Use --name, --income, or --tax-rate.");
                return Ok(());
            }

            let changes = MemberUpdate {
                name,
                monthly_income: income.as_deref().map(super::parse_money).transpose()?,
                tax_rate: tax_rate.as_deref().map(super::parse_fraction).transpose()?,
            };

            let income_changed = changes.monthly_income.is_some();
            let updated = service.update(&user.id, changes)?;
            println!("Updated member: {}", updated.name);

            if income_changed {
                println!(
                    "Existing percentage splits keep their shares; run 'ledger expense rebalance --all' to reweight them."
                );
            }
        }
    }

    Ok(())
}

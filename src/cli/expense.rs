//! Expense CLI commands
//!
//! Adding, editing and inspecting expenses, including how each one splits
//! between members.

use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_list, format_shares};
use crate::engine::{SortKey, SortState};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Amount, Frequency, ShareMap, SplitStrategy, User};
use crate::services::{
    CategoryService, ExpenseFilter, ExpenseService, ExpenseUpdate, MemberService, NewExpense,
};
use crate::storage::Storage;

/// How often an expense recurs
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    Yearly,
}

impl From<FrequencyArg> for Frequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => Frequency::Monthly,
            FrequencyArg::Yearly => Frequency::Yearly,
        }
    }
}

/// Split strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitArg {
    /// Evenly between all members
    Equal,
    /// By fraction; income-weighted unless --share is given
    Percentage,
    /// Owned by one member (requires --owner)
    Fixed,
}

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add a new expense
    Add {
        /// Expense name
        name: String,
        /// Amount per period (e.g., "45", "1,200.00")
        amount: String,
        /// Category name or ID
        #[arg(short, long, default_value = "shared")]
        category: String,
        /// How often the amount recurs
        #[arg(short, long, value_enum, default_value = "monthly")]
        frequency: FrequencyArg,
        /// Split strategy
        #[arg(short, long, value_enum, default_value = "equal")]
        split: SplitArg,
        /// Owner of a fixed (personal) expense
        #[arg(short, long)]
        owner: Option<String>,
        /// Percentage share as MEMBER=FRACTION (e.g., "Ana=0.6" or "Ana=60%")
        #[arg(long = "share")]
        shares: Vec<String>,
        /// Member who pays the bill (defaults to the owner of a fixed expense)
        #[arg(short, long)]
        paid_by: Option<String>,
        /// Personal category name or ID
        #[arg(short, long)]
        group: Option<String>,
        /// Mark as a budgeted (variable) expense
        #[arg(short, long)]
        budgeted: bool,
    },

    /// Edit an existing expense
    Edit {
        /// Expense name or ID
        expense: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long, value_enum)]
        frequency: Option<FrequencyArg>,
        #[arg(short, long, value_enum)]
        split: Option<SplitArg>,
        #[arg(short, long)]
        owner: Option<String>,
        #[arg(long = "share")]
        shares: Vec<String>,
        #[arg(short, long)]
        paid_by: Option<String>,
        /// Move to another category
        #[arg(short, long)]
        category: Option<String>,
        /// Personal category name or ID
        #[arg(short, long, conflicts_with = "clear_group")]
        group: Option<String>,
        /// Remove the personal category
        #[arg(long)]
        clear_group: bool,
        /// Set budgeted (true) or fixed (false)
        #[arg(short, long)]
        budgeted: Option<bool>,
    },

    /// Delete an expense
    Delete {
        /// Expense name or ID
        expense: String,
    },

    /// Show expense details
    Show {
        /// Expense name or ID
        expense: String,
    },

    /// List expenses
    List {
        /// Only expenses in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only shared expenses
        #[arg(long, conflicts_with = "personal")]
        shared: bool,
        /// Only personal expenses
        #[arg(long)]
        personal: bool,
        /// Sort key (name or amount); defaults to the configured sort
        #[arg(short, long)]
        sort: Option<SortKey>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show what each member owes for an expense
    Shares {
        /// Expense name or ID
        expense: String,
    },

    /// Recompute income-weighted percentage shares from current incomes
    Rebalance {
        /// Expense name or ID
        #[arg(required_unless_present = "all")]
        expense: Option<String>,
        /// Rebalance every percentage split
        #[arg(long, conflicts_with = "expense")]
        all: bool,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let service = ExpenseService::new(storage, settings);
    let members = MemberService::new(storage, settings);
    let categories = CategoryService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            name,
            amount,
            category,
            frequency,
            split,
            owner,
            shares,
            paid_by,
            group,
            budgeted,
        } => {
            let category = categories.resolve(&category)?;
            let split = build_split(&members, split, owner.as_deref(), &shares)?;

            let paid_by = match (paid_by, &split) {
                (Some(payer), _) => members.resolve(&payer)?.id,
                (None, SplitStrategy::Fixed { owner }) => owner.clone(),
                (None, _) => {
                    return Err(LedgerError::Validation(
                        "--paid-by is required for shared expenses".into(),
                    ))
                }
            };

            let personal_category_id = match group {
                Some(g) => Some(categories.resolve_personal(&g)?.id),
                None => None,
            };

            let expense = service.create(NewExpense {
                category_id: category.id.clone(),
                name,
                amount: parse_amount(&amount)?,
                frequency: frequency.into(),
                split,
                paid_by,
                personal_category_id,
                is_budgeted: budgeted,
            })?;

            println!("Added expense: {}", expense.name);
            println!("  Category: {}", category.name);
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::Edit {
            expense,
            name,
            amount,
            frequency,
            split,
            owner,
            shares,
            paid_by,
            category,
            group,
            clear_group,
            budgeted,
        } => {
            let located = service.resolve(&expense)?;

            let split_kind = split.or(if !shares.is_empty() {
                Some(SplitArg::Percentage)
            } else if owner.is_some() {
                Some(SplitArg::Fixed)
            } else {
                None
            });

            let personal_category_id = if clear_group {
                Some(None)
            } else {
                match group {
                    Some(g) => Some(Some(categories.resolve_personal(&g)?.id)),
                    None => None,
                }
            };

            let changes = ExpenseUpdate {
                name,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                frequency: frequency.map(Frequency::from),
                split: split_kind
                    .map(|kind| build_split(&members, kind, owner.as_deref(), &shares))
                    .transpose()?,
                paid_by: paid_by.map(|p| members.resolve(&p).map(|u| u.id)).transpose()?,
                personal_category_id,
                is_budgeted: budgeted,
                category_id: category
                    .map(|c| categories.resolve(&c).map(|c| c.id))
                    .transpose()?,
            };

            if changes.is_empty() {
                println!("No changes specified. Run 'ledger expense edit --help' for options.");
                return Ok(());
            }

            let updated = service.update(&located.expense.id, changes)?;
            println!("Updated expense: {}", updated.name);
        }

        ExpenseCommands::Delete { expense } => {
            let located = service.resolve(&expense)?;
            let removed = service.delete(&located.expense.id)?;
            println!("Deleted expense: {}", removed.name);
        }

        ExpenseCommands::Show { expense } => {
            let located = service.resolve(&expense)?;
            let category_name = categories
                .find(located.category_id.as_str())?
                .map(|c| c.name)
                .unwrap_or_else(|| located.category_id.to_string());
            let personal_name = match &located.expense.personal_category_id {
                Some(id) => categories.find_personal(id.as_str())?.map(|c| c.name),
                None => None,
            };

            print!(
                "{}",
                format_expense_details(
                    &located.expense,
                    &category_name,
                    personal_name.as_deref(),
                    &members.list()?,
                    symbol
                )
            );
        }

        ExpenseCommands::List {
            category,
            shared,
            personal,
            sort,
            desc,
        } => {
            let filter = ExpenseFilter {
                category_id: category
                    .map(|c| categories.resolve(&c).map(|c| c.id))
                    .transpose()?,
                shared: if shared {
                    Some(true)
                } else if personal {
                    Some(false)
                } else {
                    None
                },
                budgeted: None,
            };

            let state = sort_state(sort.unwrap_or(settings.default_sort), desc);
            let expenses = service.list(&filter, state.key, state.order)?;
            print!("{}", format_expense_list(&expenses, &members.list()?, symbol));
        }

        ExpenseCommands::Shares { expense } => {
            let located = service.resolve(&expense)?;
            let shares = service.shares(&located.expense.id)?;
            print!("{}", format_shares(&shares, &members.list()?, symbol));
        }

        ExpenseCommands::Rebalance { expense, all } => {
            if all {
                let updated = service.rebalance_all()?;
                println!("Rebalanced {} percentage split(s)", updated.len());
            } else if let Some(expense) = expense {
                let located = service.resolve(&expense)?;
                let updated = service.rebalance(&located.expense.id)?;
                println!("Rebalanced expense: {}", updated.name);
            }
        }
    }

    Ok(())
}

/// Build a sort state for `key`, flipped once for descending
pub(crate) fn sort_state(key: SortKey, desc: bool) -> SortState {
    let mut state = SortState::new(key);
    if desc {
        state.select(key);
    }
    state
}

fn parse_amount(s: &str) -> LedgerResult<Amount> {
    Amount::parse(s).map_err(|e| LedgerError::Validation(e.to_string()))
}

fn build_split(
    members: &MemberService<'_>,
    kind: SplitArg,
    owner: Option<&str>,
    shares: &[String],
) -> LedgerResult<SplitStrategy> {
    match kind {
        SplitArg::Equal => Ok(SplitStrategy::Equal),
        SplitArg::Percentage => {
            let mut map = ShareMap::new();
            for entry in shares {
                let (who, fraction) = entry.split_once('=').ok_or_else(|| {
                    LedgerError::Validation(format!(
                        "Invalid share '{}': expected MEMBER=FRACTION",
                        entry
                    ))
                })?;
                let user: User = members.resolve(who)?;
                map.insert(user.id, super::parse_fraction(fraction)?);
            }
            Ok(SplitStrategy::Percentage { shares: map })
        }
        SplitArg::Fixed => {
            let owner = owner.ok_or_else(|| {
                LedgerError::Validation("A fixed split requires --owner".into())
            })?;
            Ok(SplitStrategy::Fixed {
                owner: members.resolve(owner)?.id,
            })
        }
    }
}

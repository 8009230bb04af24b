use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use household_ledger::cli::{
    handle_category_command, handle_expense_command, handle_export_command,
    handle_history_command, handle_member_command, handle_personal_command,
    handle_summary_command, CategoryCommands, ExpenseCommands, ExportArgs, MemberCommands,
    PersonalCommands, SummaryArgs,
};
use household_ledger::config::{LedgerPaths, Settings};
use household_ledger::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "ledger",
    version,
    about = "Household expense ledger",
    long_about = "Track a household's recurring expenses, split shared costs between \
                  members by income or fixed amounts, and see what each member has \
                  left over each month."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new household
    Init,

    /// Show current configuration and paths
    Config,

    /// Household member management
    #[command(subcommand)]
    Member(MemberCommands),

    /// Expense category management
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Personal category management
    #[command(subcommand)]
    Personal(PersonalCommands),

    /// Expense management
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Show the household summary
    Summary(SummaryArgs),

    /// Export the household
    Export(ExportArgs),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("Household ledger");
            println!();
            println!("Run 'ledger --help' for usage information.");
            println!("Run 'ledger init' to set up a new household.");
            return Ok(());
        }
    };

    match command {
        Commands::Init => {
            println!("Initializing household at: {}", paths.base_dir().display());
            let created = initialize_storage(&paths)?;
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }
            if created {
                println!("Initialization complete!");
                println!();
                println!("A shared category has been created for household expenses.");
                println!("Run 'ledger member approve <NAME>' to add members.");
            } else {
                println!("Household already initialized; nothing changed.");
            }
            return Ok(());
        }
        Commands::Config => {
            println!("Household Ledger Configuration");
            println!("==============================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Household file:  {}", paths.household_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!("Initialized:     {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Default tax rate: {}", settings.default_tax_rate);
            println!("  Split tolerance:  {}", settings.split_tolerance);
            println!("  Default sort:     {}", settings.default_sort);
            return Ok(());
        }
        _ => {}
    }

    if !paths.is_initialized() {
        bail!("Household not initialized. Run 'ledger init' first.");
    }

    let storage = Storage::new(paths)?;
    storage.load_all()?;

    match command {
        Commands::Member(cmd) => handle_member_command(&storage, &settings, cmd)?,
        Commands::Category(cmd) => handle_category_command(&storage, &settings, cmd)?,
        Commands::Personal(cmd) => handle_personal_command(&storage, cmd)?,
        Commands::Expense(cmd) => handle_expense_command(&storage, &settings, cmd)?,
        Commands::Summary(args) => handle_summary_command(&storage, &settings, args)?,
        Commands::Export(args) => handle_export_command(&storage, &settings, args)?,
        Commands::History { limit } => handle_history_command(&storage, limit)?,
        Commands::Init | Commands::Config => {}
    }

    Ok(())
}

pub mod accounts;
pub mod categories;
pub mod import;
pub mod init;
pub mod runs;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "minty", about = "Personal finance CLI: import bank statements, dedupe, auto-categorize.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Minty: choose a data directory and initialize the database.
    Init {
        /// Path for Minty data (default: ~/Documents/minty)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Import a bank-statement CSV into an account.
    Import {
        /// Path to the statement CSV
        file: String,
        /// Account name to import into
        #[arg(long)]
        account: String,
        /// Bank source key (e.g. capital_one_360)
        #[arg(long)]
        format: Option<String>,
        /// Compute counts without persisting any transactions
        #[arg(long)]
        trial: bool,
    },
    /// Show import-run history.
    Runs,
    /// List category paths.
    Categories,
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Add a new account.
    Add {
        name: String,
        #[arg(long)]
        institution: Option<String>,
        #[arg(long = "last-four")]
        last_four: Option<String>,
    },
    /// List accounts.
    List,
}

mod classifier;
mod cli;
mod db;
mod error;
mod fmt;
mod importer;
mod models;
mod settings;
mod statement;

use clap::Parser;

use cli::{AccountsCommands, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Accounts { command } => match command {
            AccountsCommands::Add {
                name,
                institution,
                last_four,
            } => cli::accounts::add(&name, institution.as_deref(), last_four.as_deref()),
            AccountsCommands::List => cli::accounts::list(),
        },
        Commands::Import {
            file,
            account,
            format,
            trial,
        } => cli::import::run(&file, &account, format.as_deref(), trial),
        Commands::Runs => cli::runs::run(),
        Commands::Categories => cli::categories::list(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

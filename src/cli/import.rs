use std::path::Path;

use colored::Colorize;

use crate::db::get_connection;
use crate::error::Result;
use crate::importer::import_statement;
use crate::settings::get_data_dir;

pub fn run(file: &str, account: &str, format: Option<&str>, trial: bool) -> Result<()> {
    let path = Path::new(file);
    let text = std::fs::read_to_string(path)?;
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or(file);

    let conn = get_connection(&get_data_dir().join("minty.db"))?;
    let summary = import_statement(&conn, &text, account, format, filename, trial)?;

    if trial {
        println!(
            "{} {} of {} would be imported, {} duplicates, {} unreadable lines",
            "trial:".yellow().bold(),
            summary.imported,
            summary.total,
            summary.duplicates,
            summary.errors,
        );
    } else {
        println!(
            "{} imported, {} duplicates skipped, {} unreadable lines",
            summary.imported.to_string().green().bold(),
            summary.duplicates,
            summary.errors,
        );
    }
    Ok(())
}

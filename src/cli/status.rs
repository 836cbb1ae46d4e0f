use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("minty.db");

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if !db_path.exists() {
        println!();
        println!("Database not found. Run `minty init` to set up.");
        return Ok(());
    }

    let conn = get_connection(&db_path)?;
    let accounts: i64 = conn.query_row("SELECT count(*) FROM accounts", [], |r| r.get(0))?;
    let transactions: i64 =
        conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
    let uncategorized: i64 = conn.query_row(
        "SELECT count(*) FROM transactions WHERE category_id IS NULL",
        [],
        |r| r.get(0),
    )?;
    let runs: i64 = conn.query_row("SELECT count(*) FROM import_runs", [], |r| r.get(0))?;
    let net: Option<i64> = conn.query_row(
        "SELECT sum(amount_cents) FROM transactions",
        [],
        |r| r.get(0),
    )?;

    println!();
    println!("Accounts:       {accounts}");
    println!("Transactions:   {transactions}");
    println!("Uncategorized:  {uncategorized}");
    println!("Import runs:    {runs}");
    println!("Net flow:       {}", money(net.unwrap_or(0)));
    Ok(())
}

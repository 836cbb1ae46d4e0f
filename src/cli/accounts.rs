use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::{get_data_dir, load_settings};

pub fn add(name: &str, institution: Option<&str>, last_four: Option<&str>) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("minty.db"))?;
    let currency = load_settings().default_currency;
    conn.execute(
        "INSERT INTO accounts (name, institution, last_four, currency) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![name, institution, last_four, currency],
    )?;
    println!("Added account: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("minty.db"))?;
    let mut stmt =
        conn.prepare("SELECT id, name, institution, last_four, currency FROM accounts")?;
    let rows: Vec<(i64, String, Option<String>, Option<String>, String)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Institution", "Last Four", "Currency"]);
    for (id, name, inst, last, currency) in rows {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(name),
            Cell::new(inst.unwrap_or_default()),
            Cell::new(last.unwrap_or_default()),
            Cell::new(currency),
        ]);
    }
    println!("Accounts\n{table}");
    Ok(())
}

use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::get_data_dir;

pub fn run() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("minty.db"))?;
    let mut stmt = conn.prepare(
        "SELECT r.id, a.name, r.filename, r.source, r.total, r.imported, r.duplicates, r.errors, r.is_trial, r.created_at \
         FROM import_runs r JOIN accounts a ON r.account_id = a.id \
         ORDER BY r.id DESC",
    )?;
    let rows: Vec<(i64, String, Option<String>, String, i64, i64, i64, i64, bool, String)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Account", "File", "Source", "Total", "Imported", "Dupes", "Errors", "Trial", "When",
    ]);
    for (id, account, filename, source, total, imported, dupes, errors, is_trial, when) in rows {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(account),
            Cell::new(filename.unwrap_or_default()),
            Cell::new(source),
            Cell::new(total),
            Cell::new(imported),
            Cell::new(dupes),
            Cell::new(errors),
            Cell::new(if is_trial { "yes" } else { "" }),
            Cell::new(when),
        ]);
    }
    println!("Import runs\n{table}");
    Ok(())
}

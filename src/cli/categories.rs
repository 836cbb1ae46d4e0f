use crate::db::{get_connection, CategoryPaths};
use crate::error::Result;
use crate::settings::get_data_dir;

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("minty.db"))?;
    let paths = CategoryPaths::load(&conn)?;
    let mut all: Vec<&str> = paths.paths().map(|(p, _)| p).collect();
    all.sort_unstable();
    for path in all {
        println!("{path}");
    }
    Ok(())
}

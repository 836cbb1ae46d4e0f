use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{save_settings, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = Settings::default();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }

    let dir = std::path::PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&dir)?;

    let conn = get_connection(&dir.join("minty.db"))?;
    init_db(&conn)?;
    save_settings(&settings)?;

    println!("Initialized Minty in {}", dir.display());
    println!("Next: `minty accounts add <name>` then `minty import <file> --account <name>`");
    Ok(())
}

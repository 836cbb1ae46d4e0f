use std::collections::{HashMap, HashSet};
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    institution TEXT,
    last_four TEXT,
    currency TEXT NOT NULL DEFAULT 'USD',
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    parent_id INTEGER,
    FOREIGN KEY (parent_id) REFERENCES categories(id)
);

CREATE TABLE IF NOT EXISTS import_runs (
    id INTEGER PRIMARY KEY,
    account_id INTEGER NOT NULL,
    filename TEXT,
    source TEXT NOT NULL,
    total INTEGER NOT NULL DEFAULT 0,
    imported INTEGER NOT NULL DEFAULT 0,
    duplicates INTEGER NOT NULL DEFAULT 0,
    errors INTEGER NOT NULL DEFAULT 0,
    is_trial INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (account_id) REFERENCES accounts(id)
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    account_id INTEGER NOT NULL,
    run_id INTEGER,
    posted_date TEXT NOT NULL,
    description TEXT NOT NULL,
    amount_cents INTEGER NOT NULL,
    currency TEXT NOT NULL DEFAULT 'USD',
    external_id TEXT,
    dedupe_hash TEXT NOT NULL,
    balance_cents INTEGER,
    category_id INTEGER,
    merchant TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (account_id) REFERENCES accounts(id),
    FOREIGN KEY (run_id) REFERENCES import_runs(id),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_transactions_dedupe
    ON transactions (account_id, dedupe_hash);
";

// (name, children)
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Transfer", &["Internal Transfer", "Credit Card Payment"]),
    ("Income", &["Payroll", "Interest"]),
    ("Bills & Utilities", &["Phone", "Rent"]),
    ("Transportation", &["Car Payment", "Gas"]),
    ("Personal", &["Fitness", "Peer-to-Peer Payment"]),
    ("Financial", &["Service Fees"]),
    ("Food & Dining", &["Groceries", "Restaurants"]),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |row| row.get(0))?;
    if count == 0 {
        for (parent, children) in DEFAULT_CATEGORIES {
            conn.execute("INSERT INTO categories (name) VALUES (?1)", [parent])?;
            let parent_id = conn.last_insert_rowid();
            for child in *children {
                conn.execute(
                    "INSERT INTO categories (name, parent_id) VALUES (?1, ?2)",
                    rusqlite::params![child, parent_id],
                )?;
            }
        }
    }
    Ok(())
}

pub fn account_id_by_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row("SELECT id FROM accounts WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(id)
}

/// Which of the given dedupe hashes already exist for this account.
pub fn existing_hashes<'a>(
    conn: &Connection,
    account_id: i64,
    hashes: impl Iterator<Item = &'a str>,
) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM transactions WHERE account_id = ?1 AND dedupe_hash = ?2",
    )?;
    let mut found = HashSet::new();
    for hash in hashes {
        if stmt.exists(rusqlite::params![account_id, hash])? {
            found.insert(hash.to_string());
        }
    }
    Ok(found)
}

/// Full category paths ("Parent > Child") resolved to ids, built once per
/// import from the parent-pointer hierarchy with a memoized walk.
pub struct CategoryPaths {
    by_path: HashMap<String, i64>,
}

impl CategoryPaths {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut stmt = conn.prepare("SELECT id, name, parent_id FROM categories")?;
        let nodes: HashMap<i64, (String, Option<i64>)> = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, (row.get(1)?, row.get(2)?)))
            })?
            .collect::<std::result::Result<_, _>>()?;

        let mut memo: HashMap<i64, String> = HashMap::new();
        let mut by_path = HashMap::new();
        for &id in nodes.keys() {
            if let Some(path) = build_path(id, &nodes, &mut memo) {
                by_path.insert(path, id);
            }
        }
        Ok(Self { by_path })
    }

    /// Resolve a path to a category id; unknown paths are never invented.
    pub fn id_for(&self, path: &str) -> Option<i64> {
        self.by_path.get(path).copied()
    }

    pub fn paths(&self) -> impl Iterator<Item = (&str, i64)> {
        self.by_path.iter().map(|(p, id)| (p.as_str(), *id))
    }
}

fn build_path(
    id: i64,
    nodes: &HashMap<i64, (String, Option<i64>)>,
    memo: &mut HashMap<i64, String>,
) -> Option<String> {
    if let Some(path) = memo.get(&id) {
        return Some(path.clone());
    }
    let (name, parent_id) = nodes.get(&id)?;
    let path = match parent_id {
        Some(pid) => format!("{} > {}", build_path(*pid, nodes, memo)?, name),
        None => name.clone(),
    };
    memo.insert(id, path.clone());
    Some(path)
}

use rusqlite::Connection;

use crate::db::{self, CategoryPaths};
use crate::error::{MintyError, Result};
use crate::statement::BankSource;

#[derive(Debug)]
pub struct ImportSummary {
    pub run_id: i64,
    pub total: usize,
    /// New-transaction count; on a trial this is what *would* be imported.
    pub imported: usize,
    pub duplicates: usize,
    /// Export lines the reader dropped as structurally unusable.
    pub errors: usize,
    pub trial: bool,
}

/// Drive the statement pipeline against the store: normalize, partition
/// against existing dedupe hashes, record the run, and persist the new
/// subset unless this is a trial.
pub fn import_statement(
    conn: &Connection,
    text: &str,
    account_name: &str,
    source_key: Option<&str>,
    filename: &str,
    trial: bool,
) -> Result<ImportSummary> {
    let account_id = db::account_id_by_name(conn, account_name)?
        .ok_or_else(|| MintyError::UnknownAccount(account_name.to_string()))?;

    let source = match source_key {
        Some(key) => BankSource::from_key(key)
            .ok_or_else(|| MintyError::UnsupportedSource(key.to_string()))?,
        None => BankSource::CapitalOne360,
    };

    let batch = source.normalize_statement(text, account_id)?;
    let total = batch.transactions.len();

    let existing = db::existing_hashes(
        conn,
        account_id,
        batch.transactions.iter().map(|t| t.dedupe_hash.as_str()),
    )?;
    let (new, duplicates): (Vec<_>, Vec<_>) = batch
        .transactions
        .into_iter()
        .partition(|t| !existing.contains(&t.dedupe_hash));

    conn.execute(
        "INSERT INTO import_runs (account_id, filename, source, total, imported, duplicates, errors, is_trial) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            account_id,
            filename,
            source.key(),
            total as i64,
            new.len() as i64,
            duplicates.len() as i64,
            batch.skipped_rows as i64,
            trial,
        ],
    )?;
    let run_id = conn.last_insert_rowid();

    if !trial {
        let paths = CategoryPaths::load(conn)?;
        let mut stmt = conn.prepare_cached(
            "INSERT INTO transactions (account_id, run_id, posted_date, description, amount_cents, \
             currency, external_id, dedupe_hash, balance_cents, category_id, merchant) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        for txn in &new {
            let category_id = txn
                .suggested_category
                .as_deref()
                .and_then(|path| paths.id_for(path));
            stmt.execute(rusqlite::params![
                account_id,
                run_id,
                txn.posted_date,
                txn.description,
                txn.amount_cents,
                txn.currency,
                txn.external_id,
                txn.dedupe_hash,
                txn.balance_cents,
                category_id,
                txn.suggested_merchant,
            ])?;
        }
    }

    Ok(ImportSummary {
        run_id,
        total,
        imported: new.len(),
        duplicates: duplicates.len(),
        errors: batch.skipped_rows,
        trial,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use rusqlite::Connection;

    const STATEMENT: &str = "Account Number,Transaction Description,Transaction Date,Transaction Type,Transaction Amount,Balance\n\
1234,PAYROLL DEPOSIT,01/16/24,Credit,2000.00,2994.57\n\
1234,STARBUCKS STORE #123,01/15/24,Debit,5.43,1000.00\n";

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        conn.execute("INSERT INTO accounts (name) VALUES ('Checking')", []).unwrap();
        (dir, conn)
    }

    fn txn_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0)).unwrap()
    }

    #[test]
    fn test_import_inserts_and_categorizes() {
        let (_dir, conn) = test_db();
        let summary =
            import_statement(&conn, STATEMENT, "Checking", None, "jan.csv", false).unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.duplicates, 0);
        assert_eq!(summary.errors, 0);
        assert_eq!(txn_count(&conn), 2);

        let (cents, cat): (i64, Option<i64>) = conn
            .query_row(
                "SELECT amount_cents, category_id FROM transactions WHERE description = 'PAYROLL DEPOSIT'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(cents, 200000);
        assert!(cat.is_some(), "payroll row should resolve Income > Payroll");

        let uncat: Option<i64> = conn
            .query_row(
                "SELECT category_id FROM transactions WHERE description = 'STARBUCKS STORE #123'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(uncat, None);
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let (_dir, conn) = test_db();
        import_statement(&conn, STATEMENT, "Checking", None, "jan.csv", false).unwrap();
        let second =
            import_statement(&conn, STATEMENT, "Checking", None, "jan.csv", false).unwrap();
        assert_eq!(second.duplicates, second.total);
        assert_eq!(second.imported, 0);
        assert_eq!(txn_count(&conn), 2);
    }

    #[test]
    fn test_overlapping_statement_imports_only_new() {
        let (_dir, conn) = test_db();
        import_statement(&conn, STATEMENT, "Checking", None, "jan.csv", false).unwrap();
        let overlap = "h,h,h,h,h,h\n\
1234,RENT ALCOVE,01/17/24,Debit,1500.00,1494.57\n\
1234,PAYROLL DEPOSIT,01/16/24,Credit,2000.00,2994.57\n";
        let summary =
            import_statement(&conn, overlap, "Checking", None, "jan2.csv", false).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(txn_count(&conn), 3);
    }

    #[test]
    fn test_trial_never_persists_transactions() {
        let (_dir, conn) = test_db();
        let summary =
            import_statement(&conn, STATEMENT, "Checking", None, "jan.csv", true).unwrap();
        assert!(summary.trial);
        assert_eq!(summary.imported, 2, "reports what would be imported");
        assert_eq!(txn_count(&conn), 0);

        // The trial run itself is on record, flagged as such.
        let is_trial: bool = conn
            .query_row("SELECT is_trial FROM import_runs WHERE id = ?1", [summary.run_id], |r| {
                r.get(0)
            })
            .unwrap();
        assert!(is_trial);
    }

    #[test]
    fn test_reader_leniency_counts_errors() {
        let (_dir, conn) = test_db();
        let text = "h,h,h,h,h,h\n\
1234,PAYROLL DEPOSIT,01/16/24,Credit,2000.00,2994.57\n\
short,row\n\
1234,STARBUCKS STORE #123,01/15/24,Debit,5.43,1000.00\n";
        let summary = import_statement(&conn, text, "Checking", None, "jan.csv", false).unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.imported, 2);
    }

    #[test]
    fn test_malformed_row_aborts_with_nothing_committed() {
        let (_dir, conn) = test_db();
        let text = "h,h,h,h,h,h\n\
1234,GOOD,01/16/24,Credit,2000.00,2994.57\n\
1234,BAD,01/16/24,Credit,two grand,2994.57\n";
        let err = import_statement(&conn, text, "Checking", None, "jan.csv", false).unwrap_err();
        assert!(matches!(err, MintyError::MalformedRow { .. }));
        assert_eq!(txn_count(&conn), 0);
        let runs: i64 = conn.query_row("SELECT count(*) FROM import_runs", [], |r| r.get(0)).unwrap();
        assert_eq!(runs, 0);
    }

    #[test]
    fn test_unknown_account_and_source() {
        let (_dir, conn) = test_db();
        assert!(matches!(
            import_statement(&conn, STATEMENT, "Nope", None, "f.csv", false).unwrap_err(),
            MintyError::UnknownAccount(_)
        ));
        assert!(matches!(
            import_statement(&conn, STATEMENT, "Checking", Some("mt940"), "f.csv", false).unwrap_err(),
            MintyError::UnsupportedSource(_)
        ));
    }
}

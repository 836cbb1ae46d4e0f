use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;

const STATEMENT: &str = "Account Number,Transaction Description,Transaction Date,Transaction Type,Transaction Amount,Balance\n\
1234,PAYROLL DEPOSIT,01/16/24,Credit,2000.00,2994.57\n\
1234,STARBUCKS STORE #123,01/15/24,Debit,5.43,1000.00\n";

/// Binary invocation with HOME pointed at a scratch dir so settings and the
/// database never touch the real user profile.
fn minty(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("minty").unwrap();
    cmd.env("HOME", home);
    cmd
}

fn setup(home: &Path) {
    let data_dir = home.join("data");
    minty(home)
        .args(["init", "--data-dir", data_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Initialized Minty"));
    minty(home)
        .args(["accounts", "add", "Checking"])
        .assert()
        .success();
}

#[test]
fn import_then_reimport_is_idempotent() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());
    let csv = home.path().join("jan.csv");
    std::fs::write(&csv, STATEMENT).unwrap();

    minty(home.path())
        .args(["import", csv.to_str().unwrap(), "--account", "Checking"])
        .assert()
        .success()
        .stdout(contains("imported, 0 duplicates skipped"));

    minty(home.path())
        .args(["import", csv.to_str().unwrap(), "--account", "Checking"])
        .assert()
        .success()
        .stdout(contains("2 duplicates skipped"));

    minty(home.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(contains("Transactions:   2"));
}

#[test]
fn trial_import_persists_nothing() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());
    let csv = home.path().join("jan.csv");
    std::fs::write(&csv, STATEMENT).unwrap();

    minty(home.path())
        .args(["import", csv.to_str().unwrap(), "--account", "Checking", "--trial"])
        .assert()
        .success()
        .stdout(contains("would be imported"));

    minty(home.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(contains("Transactions:   0"));
}

#[test]
fn unknown_account_fails() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());
    let csv = home.path().join("jan.csv");
    std::fs::write(&csv, STATEMENT).unwrap();

    minty(home.path())
        .args(["import", csv.to_str().unwrap(), "--account", "Savings"])
        .assert()
        .failure()
        .stderr(contains("Unknown account"));
}

#[test]
fn categories_include_classifier_paths() {
    let home = tempfile::tempdir().unwrap();
    setup(home.path());
    minty(home.path())
        .args(["categories"])
        .assert()
        .success()
        .stdout(contains("Income > Payroll"))
        .stdout(contains("Bills & Utilities > Phone"));
}

//! Statement pipeline: raw bank-export text to canonical transactions.
//!
//! Reader and normalizer differ in leniency: the reader silently drops
//! structurally short rows, while a row with the right shape but an
//! unparsable date or amount aborts the whole pass.

use sha2::{Digest, Sha256};

use crate::classifier::{suggest_category, suggest_merchant};
use crate::error::{MintyError, Result};
use crate::models::CanonicalTransaction;

pub const DEFAULT_CURRENCY: &str = "USD";

/// One delimited line of a bank export, fields still raw strings.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub line: usize,
    pub account_number: String,
    pub description: String,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub balance: String,
}

/// Output of one normalization pass over a statement file.
#[derive(Debug)]
pub struct StatementBatch {
    /// Chronological ascending, the reverse of the export's row order.
    pub transactions: Vec<CanonicalTransaction>,
    /// Rows the reader dropped for having too few fields.
    pub skipped_rows: usize,
}

// ---------------------------------------------------------------------------
// Bank sources — enum dispatch, one variant per supported export format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BankSource {
    CapitalOne360,
}

pub const ALL_SOURCES: &[BankSource] = &[BankSource::CapitalOne360];

impl BankSource {
    pub fn key(&self) -> &'static str {
        match self {
            Self::CapitalOne360 => "capital_one_360",
        }
    }

    #[allow(dead_code)]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CapitalOne360 => "Capital One 360 Checking",
        }
    }

    pub fn expected_fields(&self) -> usize {
        match self {
            Self::CapitalOne360 => 6,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ALL_SOURCES.iter().find(|s| s.key() == key).copied()
    }

    /// Split raw text into rows. The first record is always a header and is
    /// skipped; rows with fewer than the expected field count are dropped and
    /// counted. No quote handling: this export has no embedded delimiters.
    pub fn read_rows(&self, text: &str) -> Result<(Vec<RawRow>, usize)> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for (i, result) in rdr.records().enumerate() {
            let record = result?;
            if i == 0 {
                continue;
            }
            if record.len() < self.expected_fields() {
                skipped += 1;
                continue;
            }
            // Record index is not the file line: the reader skips blank
            // lines. Position tracks the actual line of the source file.
            let line = record.position().map_or(i + 1, |p| p.line() as usize);
            rows.push(RawRow {
                line,
                account_number: record[0].to_string(),
                description: record[1].to_string(),
                date: record[2].to_string(),
                kind: record[3].to_string(),
                amount: record[4].to_string(),
                balance: record[5].to_string(),
            });
        }
        Ok((rows, skipped))
    }

    pub fn normalize_row(&self, row: &RawRow, account_id: i64) -> Result<CanonicalTransaction> {
        match self {
            Self::CapitalOne360 => normalize_capital_one_360(row, account_id),
        }
    }

    /// Full pipeline: read, normalize every row (a malformed row is fatal),
    /// then reverse the whole sequence so output is chronological ascending.
    pub fn normalize_statement(&self, text: &str, account_id: i64) -> Result<StatementBatch> {
        let (rows, skipped_rows) = self.read_rows(text)?;
        let mut transactions = rows
            .iter()
            .map(|row| self.normalize_row(row, account_id))
            .collect::<Result<Vec<_>>>()?;
        transactions.reverse();
        Ok(StatementBatch {
            transactions,
            skipped_rows,
        })
    }
}

fn malformed(row: &RawRow, reason: impl Into<String>) -> MintyError {
    MintyError::MalformedRow {
        line: row.line,
        reason: reason.into(),
    }
}

fn normalize_capital_one_360(row: &RawRow, account_id: i64) -> Result<CanonicalTransaction> {
    let posted_date = parse_date_mdy2(&row.date)
        .ok_or_else(|| malformed(row, format!("bad date {:?}", row.date)))?;
    let magnitude = parse_amount_cents(&row.amount)
        .ok_or_else(|| malformed(row, format!("bad amount {:?}", row.amount)))?
        .abs();
    // Sign comes strictly from the Debit/Credit column, never from the
    // amount field itself.
    let amount_cents = if row.kind.trim().eq_ignore_ascii_case("debit") {
        -magnitude
    } else {
        magnitude
    };
    let balance_cents = parse_amount_cents(&row.balance)
        .ok_or_else(|| malformed(row, format!("bad balance {:?}", row.balance)))?;

    let description = row.description.trim().to_string();
    let dedupe_hash = dedupe_hash(account_id, &posted_date, &description, amount_cents);
    let suggested_category = suggest_category(&description).map(str::to_string);
    let suggested_merchant = suggest_merchant(&description);

    Ok(CanonicalTransaction {
        posted_date,
        description,
        amount_cents,
        currency: DEFAULT_CURRENCY.to_string(),
        external_id: None,
        dedupe_hash,
        balance_cents,
        suggested_category,
        suggested_merchant,
    })
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse `MM/DD/YY` into `YYYY-MM-DD`, assuming the 2000s. Dates past 2099
/// are not representable in this export format.
pub fn parse_date_mdy2(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.trim().split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let m: u32 = parts[0].parse().ok()?;
    let d: u32 = parts[1].parse().ok()?;
    let yy: i32 = parts[2].parse().ok()?;
    if !(0..100).contains(&yy) {
        return None;
    }
    chrono::NaiveDate::from_ymd_opt(2000 + yy, m, d).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Parse a decimal money string into signed integer cents without going
/// through a float. A third decimal digit rounds half away from zero.
pub fn parse_amount_cents(raw: &str) -> Option<i64> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if s.is_empty() {
        return None;
    }
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let digits: Vec<i64> = frac.bytes().map(|b| i64::from(b - b'0')).collect();
    let frac_cents = match digits.len() {
        0 => 0,
        1 => digits[0] * 10,
        _ => digits[0] * 10 + digits[1] + i64::from(digits.get(2).is_some_and(|d| *d >= 5)),
    };
    let cents = whole.checked_mul(100)?.checked_add(frac_cents)?;
    Some(if negative { -cents } else { cents })
}

/// Deterministic fingerprint of a transaction's identity. Balance and derived
/// fields are excluded: they may legitimately differ between re-exports of
/// the same underlying transaction.
pub fn dedupe_hash(account_id: i64, posted_date: &str, description: &str, amount_cents: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{account_id}|{posted_date}|{description}|{amount_cents}"));
    hex::encode(hasher.finalize())
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub institution: Option<String>,
    pub last_four: Option<String>,
    pub currency: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

/// One import attempt against one statement file.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct ImportRun {
    pub id: Option<i64>,
    pub account_id: i64,
    pub filename: String,
    pub source: String,
    pub total: i64,
    pub imported: i64,
    pub duplicates: i64,
    pub errors: i64,
    pub is_trial: bool,
}

/// Bank-agnostic normalized transaction produced by the statement pipeline.
///
/// Money is integer minor units throughout; negative `amount_cents` is money
/// out. `balance_cents` is the balance the bank reported after this
/// transaction, advisory only. Never mutated after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTransaction {
    pub posted_date: String,
    pub description: String,
    pub amount_cents: i64,
    pub currency: String,
    pub external_id: Option<String>,
    pub dedupe_hash: String,
    pub balance_cents: i64,
    pub suggested_category: Option<String>,
    pub suggested_merchant: Option<String>,
}

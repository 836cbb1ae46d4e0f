//! Best-effort category and merchant suggestions from statement descriptions.
//!
//! Both functions are pure, deterministic, and advisory: callers must treat
//! the results as hints, never validated data.

use regex::Regex;

/// Ordered (patterns, category path) pairs; first match wins. Matching is
/// case-insensitive substring.
const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (&["360 performance savings"], "Transfer > Internal Transfer"),
    (
        &["chase credit crd", "capital one online pmt"],
        "Transfer > Credit Card Payment",
    ),
    (&["payroll"], "Income > Payroll"),
    (&["interest paid"], "Income > Interest"),
    (&["tmobile"], "Bills & Utilities > Phone"),
    (&["alcove"], "Bills & Utilities > Rent"),
    (&["toyota"], "Transportation > Car Payment"),
    (&["trufit", "gym", "fitness"], "Personal > Fitness"),
    (&["zelle", "venmo"], "Personal > Peer-to-Peer Payment"),
    (&["freelancer"], "Financial > Service Fees"),
];

/// Location tokens that never name a merchant. Tokens of 2 chars or fewer are
/// dropped separately, so this list only needs the longer ones.
const SKIP_TOKENS: &[&str] = &["USA", "NYC"];

pub fn suggest_category(description: &str) -> Option<&'static str> {
    let desc = description.to_ascii_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| desc.contains(p)))
        .map(|(_, path)| *path)
}

pub fn suggest_merchant(description: &str) -> Option<String> {
    // ASCII-only lowercasing keeps byte offsets identical to the original,
    // so slicing by an offset found here cannot split a character. All the
    // phrase patterns are ASCII.
    let desc = description.to_ascii_lowercase();

    if let Some(idx) = desc.find("zelle money sent to") {
        let rest = description[idx + "zelle money sent to".len()..].trim();
        return (!rest.is_empty()).then(|| rest.to_string());
    }

    if desc.contains("venmo payment") {
        return Some("Venmo".to_string());
    }

    if let Some(idx) = desc.find("debit card purchase") {
        let rest = &description[idx + "debit card purchase".len()..];
        let tokens: Vec<&str> = rest
            .split_whitespace()
            .filter(|t| t.len() > 2 && !SKIP_TOKENS.iter().any(|s| t.eq_ignore_ascii_case(s)))
            .take(3)
            .collect();
        return (!tokens.is_empty()).then(|| tokens.join(" "));
    }

    if let Some(idx) = desc.find("withdrawal from") {
        let name = until_double_space(&description[idx + "withdrawal from".len()..]);
        return (!name.is_empty()).then(|| name.to_string());
    }

    if let Some(idx) = desc.find("deposit from") {
        let name = until_double_space(&description[idx + "deposit from".len()..]);
        // Deposits from the linked savings account are internal transfers,
        // not a counterparty.
        if name.is_empty() || name.to_ascii_lowercase().contains("360 performance") {
            return None;
        }
        return Some(name.to_string());
    }

    None
}

/// Counterparty names in this export are padded with runs of 2+ spaces before
/// trailing reference junk; take everything before the first run.
fn until_double_space(s: &str) -> &str {
    let s = s.trim_start();
    let end = Regex::new(r" {2,}")
        .ok()
        .and_then(|re| re.find(s))
        .map_or(s.len(), |m| m.start());
    s[..end].trim_end()
}

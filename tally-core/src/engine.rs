//! Keyword matching: assigns every transaction exactly one category

use std::collections::HashSet;

use crate::rules::{RuleStore, UNCATEGORIZED};
use crate::transaction::Transaction;

/// Trim surrounding whitespace and lowercase, the comparison form used
/// for both keywords and transaction details
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Assign a category to each transaction by exact keyword match.
///
/// Every transaction is first reset to "Uncategorized", so the result
/// only depends on the current ruleset. Matching compares the whole
/// normalized details string against each normalized keyword; substrings
/// never match. Categories apply in store order and a later match
/// overwrites an earlier one, so a keyword listed under two categories
/// resolves to whichever the store lists last.
pub fn categorize(mut transactions: Vec<Transaction>, store: &RuleStore) -> Vec<Transaction> {
    for txn in &mut transactions {
        txn.category = UNCATEGORIZED.to_string();
    }

    let details: Vec<String> = transactions
        .iter()
        .map(|txn| normalize(&txn.details))
        .collect();

    for (category, keywords) in store.iter() {
        if category == UNCATEGORIZED || keywords.is_empty() {
            continue;
        }

        // Hand-edited rules files can hold blank keywords; those must not
        // match rows whose details normalize to the empty string.
        let needles: HashSet<String> = keywords
            .iter()
            .map(|keyword| normalize(keyword))
            .filter(|keyword| !keyword.is_empty())
            .collect();

        for (txn, detail) in transactions.iter_mut().zip(&details) {
            if needles.contains(detail) {
                txn.category = category.to_string();
            }
        }
    }

    transactions
}

//! Per-category totals for the summary views

use indexmap::IndexMap;
use serde::Serialize;

use crate::transaction::Transaction;

/// Aggregated amount and row count for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

/// Group transactions by category and sum their amounts, largest total
/// first. Grouping keeps first-seen order and the sort is stable, so
/// categories with equal totals come out in a deterministic order.
pub fn summarize<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<CategoryTotal> {
    let mut groups: IndexMap<&str, (f64, usize)> = IndexMap::new();
    for txn in transactions {
        let entry = groups.entry(txn.category.as_str()).or_insert((0.0, 0));
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect();

    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

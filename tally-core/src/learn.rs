//! Correction feedback: manual re-categorizations become stored keywords

use crate::rules::{RuleStore, RulesError, UNCATEGORIZED};
use crate::transaction::Transaction;

/// Outcome of one correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// The category changed. `keyword_added` is false when the details
    /// were blank, already stored, or the target was "Uncategorized".
    Applied { keyword_added: bool },
    /// The transaction already carried the requested category
    Unchanged,
}

/// Re-assign one transaction and teach the store its details.
///
/// The target category must already exist; otherwise this fails with
/// `CategoryNotFound` and neither the store nor the transaction changes.
/// Moving a row back to "Uncategorized" updates the row but never stores
/// a keyword. A stored keyword is persisted before this returns.
pub fn apply_correction(
    store: &mut RuleStore,
    txn: &mut Transaction,
    new_category: &str,
) -> Result<Correction, RulesError> {
    if txn.category == new_category {
        return Ok(Correction::Unchanged);
    }
    if !store.contains(new_category) {
        return Err(RulesError::CategoryNotFound(new_category.to_string()));
    }

    txn.category = new_category.to_string();

    let keyword_added = if new_category == UNCATEGORIZED {
        false
    } else {
        store.add_keyword(new_category, &txn.details)?
    };

    Ok(Correction::Applied { keyword_added })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use crate::engine::categorize;
    use crate::transaction::Direction;

    fn txn(details: &str) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Transaction::new("txn-0000", date, details, 9.99, Direction::Debit)
    }

    fn store_with_category(name: &str) -> (TempDir, RuleStore) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RuleStore::open(dir.path().join("categories.json")).unwrap();
        store.add_category(name).unwrap();
        (dir, store)
    }

    #[test]
    fn test_correction_updates_row_and_stores_trimmed_keyword() {
        let (_dir, mut store) = store_with_category("Subscriptions");
        let mut row = txn("  Netflix  ");

        let outcome = apply_correction(&mut store, &mut row, "Subscriptions").unwrap();
        assert_eq!(outcome, Correction::Applied { keyword_added: true });
        assert_eq!(row.category, "Subscriptions");

        let stored: Vec<&str> = store
            .keywords("Subscriptions")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(stored, vec!["Netflix"]);

        // Write-through: a fresh load sees the new keyword.
        let reopened = RuleStore::open(store.path()).unwrap();
        assert_eq!(reopened.keywords("Subscriptions").unwrap().len(), 1);
    }

    #[test]
    fn test_learned_keyword_drives_future_runs() {
        let (_dir, mut store) = store_with_category("Subscriptions");
        let mut row = txn("Netflix");
        apply_correction(&mut store, &mut row, "Subscriptions").unwrap();

        let later = categorize(vec![txn("NETFLIX  ")], &store);
        assert_eq!(later[0].category, "Subscriptions");
    }

    #[test]
    fn test_same_category_is_unchanged() {
        let (_dir, mut store) = store_with_category("Subscriptions");
        let mut row = txn("Netflix");
        row.category = "Subscriptions".to_string();

        let outcome = apply_correction(&mut store, &mut row, "Subscriptions").unwrap();
        assert_eq!(outcome, Correction::Unchanged);
        assert!(store.keywords("Subscriptions").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_target_leaves_everything_alone() {
        let (_dir, mut store) = store_with_category("Subscriptions");
        let mut row = txn("Netflix");

        let err = apply_correction(&mut store, &mut row, "Travel").unwrap_err();
        assert!(matches!(err, RulesError::CategoryNotFound(name) if name == "Travel"));
        assert_eq!(row.category, UNCATEGORIZED);
        assert!(!store.contains("Travel"));
    }

    #[test]
    fn test_duplicate_details_are_stored_once() {
        let (_dir, mut store) = store_with_category("Food");
        let mut first = txn("TALABAT");
        let mut second = txn("talabat");

        let a = apply_correction(&mut store, &mut first, "Food").unwrap();
        let b = apply_correction(&mut store, &mut second, "Food").unwrap();
        assert_eq!(a, Correction::Applied { keyword_added: true });
        assert_eq!(b, Correction::Applied { keyword_added: false });
        assert_eq!(store.keywords("Food").unwrap().len(), 1);
    }

    #[test]
    fn test_moving_back_to_uncategorized_learns_nothing() {
        let (_dir, mut store) = store_with_category("Food");
        let mut row = txn("TALABAT");
        row.category = "Food".to_string();

        let outcome = apply_correction(&mut store, &mut row, UNCATEGORIZED).unwrap();
        assert_eq!(outcome, Correction::Applied { keyword_added: false });
        assert_eq!(row.category, UNCATEGORIZED);
        assert!(store.keywords(UNCATEGORIZED).unwrap().is_empty());
    }

    #[test]
    fn test_blank_details_apply_without_keyword() {
        let (_dir, mut store) = store_with_category("Food");
        let mut row = txn("   ");

        let outcome = apply_correction(&mut store, &mut row, "Food").unwrap();
        assert_eq!(outcome, Correction::Applied { keyword_added: false });
        assert_eq!(row.category, "Food");
        assert!(store.keywords("Food").unwrap().is_empty());
    }
}

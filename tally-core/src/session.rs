//! Session context: one loaded ruleset plus the transactions under review
//!
//! Commands construct a `Session` explicitly instead of reaching for any
//! ambient state; everything a review touches flows through it.

use thiserror::Error;

use crate::engine::categorize;
use crate::learn::{Correction, apply_correction};
use crate::rules::{RuleStore, RulesError};
use crate::summary::{CategoryTotal, summarize};
use crate::transaction::Transaction;

/// Errors raised by session operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no transaction with id '{0}' in this session")]
    UnknownTransaction(String),
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// A review session over one ingested statement
#[derive(Debug)]
pub struct Session {
    store: RuleStore,
    transactions: Vec<Transaction>,
}

impl Session {
    /// Start a session with no transactions loaded
    pub fn new(store: RuleStore) -> Self {
        Self {
            store,
            transactions: Vec::new(),
        }
    }

    /// Replace the working set; every row is (re)assigned by the engine
    /// on the way in
    pub fn load_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = categorize(transactions, &self.store);
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RuleStore {
        &mut self.store
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Apply a user correction, addressed by transaction id
    pub fn correct(&mut self, id: &str, new_category: &str) -> Result<Correction, SessionError> {
        let txn = self
            .transactions
            .iter_mut()
            .find(|txn| txn.id == id)
            .ok_or_else(|| SessionError::UnknownTransaction(id.to_string()))?;
        Ok(apply_correction(&mut self.store, txn, new_category)?)
    }

    /// Debit rows, in statement order (the expenses view)
    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|txn| txn.is_debit())
    }

    /// Credit rows, in statement order (the payments view)
    pub fn credits(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|txn| txn.is_credit())
    }

    /// Expense totals per category, largest first
    pub fn expense_summary(&self) -> Vec<CategoryTotal> {
        summarize(self.expenses())
    }

    /// Sum of all credit amounts
    pub fn credits_total(&self) -> f64 {
        self.credits().map(|txn| txn.amount).sum()
    }
}

//! Transaction records produced by statement ingestion

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::rules::UNCATEGORIZED;

/// Whether a statement row moves money out (Debit) or in (Credit)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    #[serde(rename = "debit")]
    Debit,
    #[serde(rename = "credit")]
    Credit,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(Direction::Debit),
            "credit" => Ok(Direction::Credit),
            other => Err(format!("unknown direction: '{other}'")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Debit => write!(f, "Debit"),
            Direction::Credit => write!(f, "Credit"),
        }
    }
}

/// One bank-statement row, held in memory for the length of a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Identifier assigned at ingestion, stable across re-reads ("txn-0000", ...)
    pub id: String,
    /// Date of the transaction
    pub date: NaiveDate,
    /// Raw description text; the value keywords are matched against
    pub details: String,
    /// Amount with grouping separators already stripped
    pub amount: f64,
    /// Debit (outgoing) or Credit (incoming)
    pub direction: Direction,
    /// Assigned category name; "Uncategorized" until the engine says otherwise
    pub category: String,
}

impl Transaction {
    /// Create a new Transaction, starting uncategorized
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        details: impl Into<String>,
        amount: f64,
        direction: Direction,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            details: details.into(),
            amount,
            direction,
            category: UNCATEGORIZED.to_string(),
        }
    }

    /// Returns true if this row is an expense
    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }

    /// Returns true if this row is an incoming payment
    pub fn is_credit(&self) -> bool {
        self.direction == Direction::Credit
    }
}

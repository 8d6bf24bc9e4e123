//! Parse bank statement CSV exports into typed transactions.
//!
//! Statements carry four columns (header names are trimmed before
//! matching, so padded exports still resolve):
//! Date,Details,Amount,Debit/Credit
//! 01 Jan 2024,Spotify,"9.99",Debit

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use tally_core::{Direction, Transaction};

/// Statement date format, e.g. "01 Jan 2024"
const DATE_FORMAT: &str = "%d %b %Y";

/// Errors raised while reading a statement
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("row {row}: invalid date '{value}' (expected e.g. 01 Jan 2024)")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: invalid amount '{value}'")]
    InvalidAmount { row: usize, value: String },
    #[error("row {row}: invalid Debit/Credit value '{value}'")]
    InvalidDirection { row: usize, value: String },
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    details: usize,
    amount: usize,
    direction: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            date: find("Date")?,
            details: find("Details")?,
            amount: find("Amount")?,
            direction: find("Debit/Credit")?,
        })
    }
}

/// Parse a statement from any reader.
///
/// Ingestion is all-or-nothing: the first malformed row aborts with an
/// error naming the row, and no partial batch is returned. A file with
/// only a header yields an empty list.
pub fn parse_statement_reader<R: Read>(reader: R) -> Result<Vec<Transaction>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let columns = Columns::resolve(rdr.headers()?)?;

    let mut transactions = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;

        let date_raw = record.get(columns.date).unwrap_or("").trim();
        let date = NaiveDate::parse_from_str(date_raw, DATE_FORMAT).map_err(|_| {
            IngestError::InvalidDate {
                row,
                value: date_raw.to_string(),
            }
        })?;

        let details = record.get(columns.details).unwrap_or("").to_string();

        let amount_raw = record.get(columns.amount).unwrap_or("").trim();
        let amount = parse_amount(row, amount_raw)?;

        let direction_raw = record.get(columns.direction).unwrap_or("").trim();
        let direction: Direction =
            direction_raw
                .parse()
                .map_err(|_| IngestError::InvalidDirection {
                    row,
                    value: direction_raw.to_string(),
                })?;

        transactions.push(Transaction::new(
            format!("txn-{row:04}"),
            date,
            details,
            amount,
            direction,
        ));
    }

    Ok(transactions)
}

/// Parse a statement CSV file from disk
pub fn parse_statement_csv(path: impl AsRef<Path>) -> Result<Vec<Transaction>, IngestError> {
    let file = File::open(path.as_ref())?;
    let transactions = parse_statement_reader(file)?;
    log::debug!(
        "parsed {} transactions from {}",
        transactions.len(),
        path.as_ref().display()
    );
    Ok(transactions)
}

/// Strip grouping commas ("12,500.00") and parse the signed amount
fn parse_amount(row: usize, raw: &str) -> Result<f64, IngestError> {
    raw.replace(",", "")
        .parse::<f64>()
        .map_err(|_| IngestError::InvalidAmount {
            row,
            value: raw.to_string(),
        })
}

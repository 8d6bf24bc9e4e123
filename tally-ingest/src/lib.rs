//! tally-ingest: statement CSV ingestion producing normalized transactions

pub mod statement;

pub use statement::{IngestError, parse_statement_csv, parse_statement_reader};

//! tally-core: category ruleset, matching engine, correction learning, and summaries

pub mod engine;
pub mod learn;
pub mod rules;
pub mod session;
pub mod summary;
pub mod transaction;

pub use engine::{categorize, normalize};
pub use learn::{Correction, apply_correction};
pub use rules::{RuleStore, RulesError, UNCATEGORIZED};
pub use session::{Session, SessionError};
pub use summary::{CategoryTotal, summarize};
pub use transaction::{Direction, Transaction};

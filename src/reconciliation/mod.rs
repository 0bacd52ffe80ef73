//! Reconciliation of computed competition totals against parsed invoices

pub mod dates;
pub mod matcher;
pub mod similarity;

pub use dates::{parse_day, DateRange};
pub use matcher::{
    aggregate_competitions, reconcile, MatchOptions, DEFAULT_SIMILARITY_THRESHOLD,
};
pub use similarity::{jaccard, name_similarity, name_tokens};

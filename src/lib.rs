//! # Invoicing Core
//!
//! A library for computing per-participant billing splits for orienteering
//! competition fees and reconciling the computed totals against scanned
//! invoices.
//!
//! ## Features
//!
//! - **Rule-based fee splitting**: ordered, first-match-wins evaluation of
//!   club billing rules (championship coverage, youth and junior subsidies,
//!   seasonal pass-throughs, capped percentage shares)
//! - **Reloadable parameters**: rule percentages, caps and date windows are
//!   loaded from a [`RuleConfigStore`] at the start of every batch
//! - **Invoice field extraction**: labeled Eventor invoice text into
//!   structured [`ParsedInvoice`] records, including archive entries
//! - **Reconciliation**: per-competition fee totals matched to invoices by
//!   date-range containment plus Jaccard name similarity, with at-most-one
//!   match consumption and an explicit unmatched report
//!
//! ## Quick Start
//!
//! ```rust
//! use bigdecimal::BigDecimal;
//! use invoicing_core::{
//!     aggregate_competitions, reconcile, BillingEngine, FeeRecord, FeeType,
//!     MatchOptions, MemoryConfigStore,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), invoicing_core::BillingError> {
//! let engine = BillingEngine::new(MemoryConfigStore::new());
//! let records = vec![FeeRecord::new(
//!     "Anna Svensson",
//!     "Vårserien deltävling 2",
//!     "2024-05-12",
//!     "D21",
//!     FeeType::Standard,
//!     BigDecimal::from(140),
//! )];
//! let billed = engine.bill(records).await?;
//! let aggregates = aggregate_competitions(&billed);
//! let report = reconcile(&aggregates, &[], &MatchOptions::default());
//! assert_eq!(report.matched.len(), 0);
//! # Ok(())
//! # }
//! ```

pub mod billing;
pub mod invoice;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use billing::*;
pub use invoice::{
    collect_invoices, extract_invoice_fields, ArchiveEntry, DocumentContent, ExtractedDocument,
    ExtractionFailure, InvoiceFile,
};
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
pub use utils::*;

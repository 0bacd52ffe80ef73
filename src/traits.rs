//! Traits for configuration storage and text extraction seams

use async_trait::async_trait;

use crate::billing::config::RuleSetConfig;
use crate::invoice::{ExtractedDocument, InvoiceFile};
use crate::types::BillingResult;

/// Storage abstraction for rule parameters.
///
/// The billing engine loads a fresh snapshot at the start of every batch,
/// which keeps "changes take effect on the next run" semantics without any
/// global mutable state. Implementations can back this with a file, a
/// database, or the bundled in-memory store.
#[async_trait]
pub trait RuleConfigStore: Send + Sync {
    /// Load the current rule parameter set
    async fn load(&self) -> BillingResult<RuleSetConfig>;

    /// Replace the stored rule parameter set
    async fn save(&self, config: &RuleSetConfig) -> BillingResult<()>;
}

/// External text-extraction capability for invoice documents.
///
/// The crate does not read PDFs itself; implementations bridge to whatever
/// extraction backend is available and return the text content per file.
/// Extractions may run concurrently per document; a failure for one file is
/// reported per-item and never fails the whole collection.
#[async_trait]
pub trait InvoiceTextExtractor: Send + Sync {
    /// Extract the text content of one uploaded invoice file
    async fn extract(&self, file: &InvoiceFile) -> BillingResult<ExtractedDocument>;
}

//! Invoice document collection
//!
//! Models what the external text-extraction step produced for each uploaded
//! file — a single text blob for a plain document, or one text per entry for
//! an archive — and turns it into [`ParsedInvoice`] records. Per-file
//! extraction failures are collected as data, never as batch errors.

pub mod extract;

use serde::{Deserialize, Serialize};

use crate::traits::InvoiceTextExtractor;
use crate::types::ParsedInvoice;

pub use extract::extract_invoice_fields;

/// One uploaded invoice file, as handed to a text extractor
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceFile {
    /// Original file name
    pub file_name: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl InvoiceFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Text extracted from one entry of an archive file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Entry path inside the archive
    pub entry_name: String,
    /// Extracted text of the entry
    pub text: String,
}

/// Extracted content for one uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentContent {
    /// A single document's text
    Text(String),
    /// One text per document entry inside an archive
    ArchiveEntries(Vec<ArchiveEntry>),
}

/// Extraction result for one uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Original file name
    pub file_name: String,
    /// Extracted text content
    pub content: DocumentContent,
}

/// A per-file extraction failure, reported alongside the successful results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    /// File that failed to extract
    pub file_name: String,
    /// Human-readable failure description
    pub message: String,
}

/// Parse the invoices contained in one extracted document. Archive entries
/// yield one invoice each, attributed to both the archive and the entry.
pub fn parse_document(document: &ExtractedDocument) -> Vec<ParsedInvoice> {
    match &document.content {
        DocumentContent::Text(text) => {
            vec![extract_invoice_fields(&document.file_name, None, text)]
        }
        DocumentContent::ArchiveEntries(entries) => entries
            .iter()
            .map(|entry| {
                extract_invoice_fields(&document.file_name, Some(&entry.entry_name), &entry.text)
            })
            .collect(),
    }
}

/// Run text extraction over a set of uploaded files and parse the results.
///
/// All extraction results are fully collected before the caller hands them
/// to the reconciliation matcher. A file that fails to extract becomes an
/// [`ExtractionFailure`]; the rest of the batch is unaffected.
pub async fn collect_invoices<E: InvoiceTextExtractor + ?Sized>(
    extractor: &E,
    files: &[InvoiceFile],
) -> (Vec<ParsedInvoice>, Vec<ExtractionFailure>) {
    let mut invoices = Vec::new();
    let mut failures = Vec::new();

    for file in files {
        match extractor.extract(file).await {
            Ok(document) => invoices.extend(parse_document(&document)),
            Err(error) => {
                tracing::warn!(file = %file.file_name, %error, "invoice extraction failed");
                failures.push(ExtractionFailure {
                    file_name: file.file_name.clone(),
                    message: error.to_string(),
                });
            }
        }
    }

    (invoices, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BillingError, BillingResult};
    use async_trait::async_trait;

    struct FixtureExtractor;

    #[async_trait]
    impl InvoiceTextExtractor for FixtureExtractor {
        async fn extract(&self, file: &InvoiceFile) -> BillingResult<ExtractedDocument> {
            match file.file_name.as_str() {
                "single.pdf" => Ok(ExtractedDocument {
                    file_name: file.file_name.clone(),
                    content: DocumentContent::Text(
                        "Tävling · Vårserien\nTävlingsdatum · 2024-05-12\n\
                         Summa att betala · 140SEK\nFakturanummer · F1"
                            .to_string(),
                    ),
                }),
                "bundle.zip" => Ok(ExtractedDocument {
                    file_name: file.file_name.clone(),
                    content: DocumentContent::ArchiveEntries(vec![
                        ArchiveEntry {
                            entry_name: "a.pdf".to_string(),
                            text: "Fakturanummer · F2".to_string(),
                        },
                        ArchiveEntry {
                            entry_name: "b.pdf".to_string(),
                            text: "Fakturanummer · F3".to_string(),
                        },
                    ]),
                }),
                other => Err(BillingError::Extraction(format!("cannot read {}", other))),
            }
        }
    }

    #[tokio::test]
    async fn collects_single_and_archive_invoices() {
        let files = vec![
            InvoiceFile::new("single.pdf", vec![]),
            InvoiceFile::new("bundle.zip", vec![]),
        ];
        let (invoices, failures) = collect_invoices(&FixtureExtractor, &files).await;
        assert!(failures.is_empty());
        assert_eq!(invoices.len(), 3);
        assert_eq!(invoices[0].competition_name.as_deref(), Some("Vårserien"));
        assert_eq!(invoices[1].entry_name.as_deref(), Some("a.pdf"));
        assert_eq!(invoices[2].invoice_number.as_deref(), Some("F3"));
        assert_eq!(invoices[2].source_file, "bundle.zip");
    }

    #[tokio::test]
    async fn extraction_failure_is_per_file_not_fatal() {
        let files = vec![
            InvoiceFile::new("broken.pdf", vec![]),
            InvoiceFile::new("single.pdf", vec![]),
        ];
        let (invoices, failures) = collect_invoices(&FixtureExtractor, &files).await;
        assert_eq!(invoices.len(), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].file_name, "broken.pdf");
        assert!(failures[0].message.contains("cannot read"));
    }
}

//! Invoice reconciliation example

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use invoicing_core::utils::MemoryConfigStore;
use invoicing_core::{
    aggregate_competitions, collect_invoices, reconcile, BillingEngine, BillingResult,
    DocumentContent, ExtractedDocument, FeeRecord, FeeType, InvoiceFile, InvoiceTextExtractor,
    MatchOptions,
};

/// A stand-in extractor that returns canned invoice text. A real
/// application would plug in a PDF text extraction backend here.
struct CannedExtractor;

#[async_trait]
impl InvoiceTextExtractor for CannedExtractor {
    async fn extract(&self, file: &InvoiceFile) -> BillingResult<ExtractedDocument> {
        let text = match file.file_name.as_str() {
            "varserien.pdf" => {
                "Tävling · Vårserien deltävling 2\nTävlingsdatum · 2024-05-12\n\
                 Summa att betala · 220SEK\nFakturanummer · 2024101"
            }
            _ => {
                "Tävling · Okänd tävling\nTävlingsdatum · 2024-03-01\n\
                 Summa att betala · 500SEK\nFakturanummer · 2024999"
            }
        };
        Ok(ExtractedDocument {
            file_name: file.file_name.clone(),
            content: DocumentContent::Text(text.to_string()),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Invoicing Core - Invoice Reconciliation Example\n");

    // 1. Bill a batch and aggregate it per competition occurrence
    println!("📋 Billing and aggregating fee records...");
    let engine = BillingEngine::new(MemoryConfigStore::new());
    let billed = engine
        .bill(vec![
            FeeRecord::new(
                "Elsa Berg",
                "Vårserien deltävling 2",
                "2024-05-12",
                "D16",
                FeeType::Standard,
                BigDecimal::from(80),
            )
            .with_birth_year(2009),
            FeeRecord::new(
                "Johan Ek",
                "Vårserien deltävling 2",
                "2024-05-12",
                "H21",
                FeeType::Standard,
                BigDecimal::from(140),
            )
            .with_birth_year(1985),
        ])
        .await?;

    let aggregates = aggregate_competitions(&billed);
    for agg in &aggregates {
        println!(
            "  {} ({}): expected total {}",
            agg.competition_name, agg.competition_date, agg.total_fee
        );
    }
    println!();

    // 2. Pull invoice fields out of uploaded documents
    println!("📄 Extracting invoice fields...");
    let files = vec![
        InvoiceFile::new("varserien.pdf", vec![]),
        InvoiceFile::new("other.pdf", vec![]),
    ];
    let (invoices, failures) = collect_invoices(&CannedExtractor, &files).await;
    println!(
        "  parsed {} invoice(s), {} file(s) failed\n",
        invoices.len(),
        failures.len()
    );

    // 3. Match invoices to competitions and report differences
    println!("🔍 Reconciling...\n");
    let report = reconcile(&aggregates, &invoices, &MatchOptions::default());

    for row in &report.matched {
        println!(
            "  ✓ {} ↔ invoice {} ({}):  billed {} vs invoiced {}  diff {}",
            row.competition_name,
            row.invoice_number.as_deref().unwrap_or("-"),
            row.invoice_source_file,
            row.competition_total,
            row.invoice_amount,
            row.difference,
        );
    }
    for invoice in &report.unmatched {
        println!(
            "  ✗ unmatched invoice from {}: {}",
            invoice.source_file,
            invoice.competition_name.as_deref().unwrap_or("(no name)"),
        );
    }

    println!("\n✅ Done");
    Ok(())
}

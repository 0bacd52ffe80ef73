//! Invoice field extraction
//!
//! Eventor invoices carry labeled lines ("Tävling", "Tävlingsdatum",
//! "Summa att betala", "Fakturanummer"). The extracted text is noisy, with
//! interpunct separators and stray spaces inside dates and amounts, so each
//! field is pulled out with a tolerant pattern and cleaned afterwards.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ParsedInvoice;

static COMPETITION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Tävling[\s·:]+").expect("valid regex"));

// labels that terminate the competition-name field
static STOP_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Tävlingsdatum|Bankgiro|Summa|Förfallodatum|Fakturanummer")
        .expect("valid regex")
});

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Tävlingsdatum[\s·:]+([0-9]{4}-\s?[0-9]{2}-\s?[0-9]{2})").expect("valid regex")
});

static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Summa(?:\s*att\s*betala)?[\s·:]*([0-9][0-9\s]*)SEK").expect("valid regex")
});

static INVOICE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Fakturanummer[\s·:]*([0-9A-Za-z]+)").expect("valid regex"));

/// Competition name: everything after the "Tävling" label up to the next
/// known label. The label pattern requires a separator after "Tävling", so
/// it cannot fire inside "Tävlingsdatum".
fn competition_name(text: &str) -> Option<String> {
    let label = COMPETITION_LABEL.find(text)?;
    let rest = &text[label.end()..];
    let end = STOP_LABEL.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    let name = rest[..end]
        .trim()
        .trim_matches(|c: char| c == '·' || c.is_whitespace());
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn strip_whitespace(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse the structured invoice fields out of one document's text.
///
/// Every field is optional; text that carries none of the labels yields an
/// invoice with only its source attribution set.
pub fn extract_invoice_fields(
    source_file: &str,
    entry_name: Option<&str>,
    text: &str,
) -> ParsedInvoice {
    let mut invoice = ParsedInvoice::empty(source_file);
    invoice.entry_name = entry_name.map(str::to_string);

    invoice.competition_name = competition_name(text);

    if let Some(captures) = DATE.captures(text) {
        // extraction sometimes splits the date around hyphens
        invoice.date = Some(strip_whitespace(&captures[1]));
    }

    if let Some(captures) = AMOUNT.captures(text) {
        let amount = strip_whitespace(&captures[1]);
        if !amount.is_empty() {
            invoice.total_amount = Some(amount);
        }
    }

    if let Some(captures) = INVOICE_NUMBER.captures(text) {
        invoice.invoice_number = Some(captures[1].to_string());
    }

    invoice
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "IFK Orientering\n\
        Faktura\n\
        Fakturanummer · 20240451\n\
        Tävling · Hallands 3-dagars, etapp 2\n\
        Tävlingsdatum · 2024-07-02\n\
        Bankgiro 123-4567\n\
        Summa att betala · 4 320SEK\n\
        Förfallodatum 2024-08-01\n";

    #[test]
    fn extracts_all_fields_from_labeled_text() {
        let invoice = extract_invoice_fields("faktura.pdf", None, SAMPLE);
        assert_eq!(
            invoice.competition_name.as_deref(),
            Some("Hallands 3-dagars, etapp 2")
        );
        assert_eq!(invoice.date.as_deref(), Some("2024-07-02"));
        assert_eq!(invoice.total_amount.as_deref(), Some("4320"));
        assert_eq!(invoice.invoice_number.as_deref(), Some("20240451"));
        assert_eq!(invoice.source_file, "faktura.pdf");
    }

    #[test]
    fn date_with_interior_spaces_is_cleaned() {
        let text = "Tävlingsdatum · 2024- 07- 02\n";
        let invoice = extract_invoice_fields("f.pdf", None, text);
        assert_eq!(invoice.date.as_deref(), Some("2024-07-02"));
    }

    #[test]
    fn short_summa_label_is_accepted() {
        let text = "Summa · 140SEK";
        let invoice = extract_invoice_fields("f.pdf", None, text);
        assert_eq!(invoice.total_amount.as_deref(), Some("140"));
    }

    #[test]
    fn competition_label_does_not_fire_on_date_label() {
        let text = "Tävlingsdatum · 2024-07-02\n";
        let invoice = extract_invoice_fields("f.pdf", None, text);
        assert_eq!(invoice.competition_name, None);
        assert_eq!(invoice.date.as_deref(), Some("2024-07-02"));
    }

    #[test]
    fn unlabeled_text_yields_empty_invoice() {
        let invoice = extract_invoice_fields("scan.pdf", None, "illegible scanner output");
        assert_eq!(invoice.competition_name, None);
        assert_eq!(invoice.date, None);
        assert_eq!(invoice.total_amount, None);
        assert_eq!(invoice.invoice_number, None);
    }

    #[test]
    fn entry_name_is_attached() {
        let invoice = extract_invoice_fields("fakturor.zip", Some("juli/f1.pdf"), SAMPLE);
        assert_eq!(invoice.entry_name.as_deref(), Some("juli/f1.pdf"));
    }
}

//! Core types and data structures for the invoicing system

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::reconciliation::DateRange;

/// Fee categories found in Eventor participation exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeType {
    /// Ordinary start fee ("Standard Startavgift")
    Standard,
    /// Late entry fee ("Efteranmälningsavgift")
    Late,
    /// Did Not Start ("Ej start")
    Dns,
    /// Chip rental / service fee ("Hyrbricka")
    ChipRental,
}

impl FeeType {
    /// Human-readable label matching the Eventor export vocabulary
    pub fn label(&self) -> &'static str {
        match self {
            FeeType::Standard => "Standard Startavgift",
            FeeType::Late => "Late",
            FeeType::Dns => "DNS",
            FeeType::ChipRental => "ChipRental",
        }
    }
}

impl std::fmt::Display for FeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FeeType {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Standard Startavgift" | "Standard" => Ok(FeeType::Standard),
            "Late" | "Efteranmälningsavgift" => Ok(FeeType::Late),
            "DNS" | "Ej start" => Ok(FeeType::Dns),
            "ChipRental" | "Hyrbricka" | "Service" => Ok(FeeType::ChipRental),
            other => Err(BillingError::Validation(format!(
                "Unknown fee type: '{}'",
                other
            ))),
        }
    }
}

/// Marker substring that identifies Swedish Championship (SM) competitions
/// in Eventor competition names.
const CHAMPIONSHIP_MARKER: &str = "SM";

/// One billable fee line for one participant at one competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRecord {
    /// Optional member identifier from the source export
    pub person_id: Option<String>,
    /// Participant name
    pub member_name: String,
    /// Competition name as exported from Eventor
    pub competition_name: String,
    /// Raw date field: `YYYY-MM-DD` or `YYYY-MM-DD - YYYY-MM-DD`
    pub competition_date: String,
    /// Competition class the participant entered
    pub class_name: String,
    /// Category of this fee line
    pub fee_type: FeeType,
    /// Fee amount in SEK, non-negative, 2-decimal precision
    pub fee_amount: BigDecimal,
    /// Whether the competition is a championship (SM) event
    pub is_championship: bool,
    /// Participant age in the competition year, if derivable
    pub age: Option<i32>,
}

impl FeeRecord {
    /// Create a fee record, deriving the championship flag from the
    /// competition name.
    pub fn new(
        member_name: impl Into<String>,
        competition_name: impl Into<String>,
        competition_date: impl Into<String>,
        class_name: impl Into<String>,
        fee_type: FeeType,
        fee_amount: BigDecimal,
    ) -> Self {
        let competition_name = competition_name.into();
        let is_championship = competition_name.contains(CHAMPIONSHIP_MARKER);
        Self {
            person_id: None,
            member_name: member_name.into(),
            competition_name,
            competition_date: competition_date.into(),
            class_name: class_name.into(),
            fee_type,
            fee_amount,
            is_championship,
            age: None,
        }
    }

    /// Set the member identifier
    pub fn with_person_id(mut self, person_id: impl Into<String>) -> Self {
        self.person_id = Some(person_id.into());
        self
    }

    /// Derive the participant age from a birth year and the competition
    /// year. Ages count the calendar year, so a runner born in 2008
    /// competing in 2024 is 16 regardless of birthday.
    pub fn with_birth_year(mut self, birth_year: i32) -> Self {
        self.age = self
            .competition_start_date()
            .map(|d| chrono::Datelike::year(&d) - birth_year);
        self
    }

    /// Explicitly set the derived age
    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    /// First day of the competition, parsed from the raw date field
    pub fn competition_start_date(&self) -> Option<chrono::NaiveDate> {
        DateRange::parse(&self.competition_date).map(|r| r.start)
    }
}

/// A fee record with its computed runner/club payment split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilledRecord {
    /// The underlying fee line
    pub record: FeeRecord,
    /// Amount invoiced to the runner
    pub runner_pays: BigDecimal,
    /// Amount covered by the club
    pub club_pays: BigDecimal,
    /// Display name of the rule that decided the split
    pub applied_rule: String,
}

/// Structured fields parsed from one invoice document
///
/// Produced by the external text extraction step; any field may be missing
/// when the source text does not carry the corresponding label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedInvoice {
    /// Name of the uploaded file the invoice came from
    pub source_file: String,
    /// Entry name when the invoice was nested inside an archive
    pub entry_name: Option<String>,
    /// Competition name printed on the invoice
    pub competition_name: Option<String>,
    /// Competition date printed on the invoice (`YYYY-MM-DD`)
    pub date: Option<String>,
    /// Invoice total as the raw numeric string from the document
    pub total_amount: Option<String>,
    /// Invoice number, used for at-most-once matching
    pub invoice_number: Option<String>,
}

impl ParsedInvoice {
    /// An invoice with no extracted fields for the given source file
    pub fn empty(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            entry_name: None,
            competition_name: None,
            date: None,
            total_amount: None,
            invoice_number: None,
        }
    }
}

/// Per-competition fee total, grouped from billed records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionAggregate {
    /// Competition name shared by the grouped records
    pub competition_name: String,
    /// Raw date string, kept for display and as part of the group key
    pub competition_date: String,
    /// Inclusive day range parsed from the raw date string
    pub date_range: DateRange,
    /// Sum of all fee amounts for this competition occurrence
    pub total_fee: BigDecimal,
}

/// One matched (competition, invoice) pair in the reconciliation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRow {
    /// Competition name from the aggregated fee data
    pub competition_name: String,
    /// Raw competition date string for display
    pub competition_date: String,
    /// Aggregated fee total for the competition
    pub competition_total: BigDecimal,
    /// File the matched invoice came from
    pub invoice_source_file: String,
    /// Archive entry name, when the invoice was nested in an archive
    pub invoice_entry_name: Option<String>,
    /// Competition name printed on the invoice
    pub invoice_competition_name: Option<String>,
    /// Date printed on the invoice
    pub invoice_date: Option<String>,
    /// Invoice total; zero when the amount could not be parsed
    pub invoice_amount: BigDecimal,
    /// Invoice number, if present
    pub invoice_number: Option<String>,
    /// Name similarity score that produced the match
    pub similarity: f64,
    /// `competition_total - invoice_amount`, rounded to 2 decimals
    pub difference: BigDecimal,
    /// True when the invoice amount was missing or unparseable
    pub amount_unparsed: bool,
}

/// Full output of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Matched (competition, invoice) pairs
    pub matched: Vec<ReconciliationRow>,
    /// Invoices that were not claimed by any competition
    pub unmatched: Vec<ParsedInvoice>,
}

/// Errors that can occur in the invoicing system
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Extraction error: {0}")]
    Extraction(String),
}

/// Result type for invoicing operations
pub type BillingResult<T> = Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_type_parses_export_labels() {
        assert_eq!(
            "Standard Startavgift".parse::<FeeType>().unwrap(),
            FeeType::Standard
        );
        assert_eq!("Ej start".parse::<FeeType>().unwrap(), FeeType::Dns);
        assert_eq!("Hyrbricka".parse::<FeeType>().unwrap(), FeeType::ChipRental);
        assert!("Entirely Unknown".parse::<FeeType>().is_err());
    }

    #[test]
    fn championship_flag_derived_from_name() {
        let record = FeeRecord::new(
            "Anna Svensson",
            "SM Medel 2024",
            "2024-09-14",
            "D21",
            FeeType::Standard,
            BigDecimal::from(250),
        );
        assert!(record.is_championship);

        let record = FeeRecord::new(
            "Anna Svensson",
            "Hallandspremiären",
            "2024-04-06",
            "D21",
            FeeType::Standard,
            BigDecimal::from(140),
        );
        assert!(!record.is_championship);
    }

    #[test]
    fn age_derived_from_birth_year_and_competition_year() {
        let record = FeeRecord::new(
            "Erik Lund",
            "Vårserien",
            "2024-05-12",
            "H16",
            FeeType::Standard,
            BigDecimal::from(120),
        )
        .with_birth_year(2008);
        assert_eq!(record.age, Some(16));
    }

    #[test]
    fn age_uses_range_start_year() {
        let record = FeeRecord::new(
            "Erik Lund",
            "O-Ringen etapp 1",
            "2024-07-22 - 2024-07-27",
            "H20",
            FeeType::Standard,
            BigDecimal::from(300),
        )
        .with_birth_year(2004);
        assert_eq!(record.age, Some(20));
    }

    #[test]
    fn unparseable_date_leaves_age_unknown() {
        let record = FeeRecord::new(
            "Erik Lund",
            "Vårserien",
            "sometime in May",
            "H16",
            FeeType::Standard,
            BigDecimal::from(120),
        )
        .with_birth_year(2008);
        assert_eq!(record.age, None);
    }
}

//! Billing rule definitions
//!
//! Each business rule is a variant of [`RuleKind`] carrying its own typed
//! parameters, dispatched by pattern matching. Lower priority numbers are
//! evaluated first and the first matching rule decides the split.

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{FeeRecord, FeeType};

/// Errors raised by a single rule's condition or action.
///
/// These never abort a batch; the engine logs them and treats the rule as
/// non-matching for the affected record.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("invalid parameter in rule '{rule}': {message}")]
    InvalidParameter { rule: String, message: String },
}

/// Raw runner/club amounts produced by a rule's action, before the engine
/// clamps and rounds them
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub runner_pays: BigDecimal,
    pub club_pays: BigDecimal,
}

impl Split {
    /// Runner pays the whole fee
    pub fn runner_full(fee: &BigDecimal) -> Self {
        Self {
            runner_pays: fee.clone(),
            club_pays: BigDecimal::zero(),
        }
    }

    /// Club covers the whole fee
    pub fn club_full(fee: &BigDecimal) -> Self {
        Self {
            runner_pays: BigDecimal::zero(),
            club_pays: fee.clone(),
        }
    }
}

/// Percentage-with-cap share parameters used by the junior and catch-all
/// rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeShare {
    /// Fraction of the fee the runner pays, 0..=1
    pub percentage: BigDecimal,
    /// Upper bound on the runner's share in SEK
    pub cap: BigDecimal,
}

impl FeeShare {
    /// `min(fee * percentage, cap)`
    fn runner_share(&self, rule: &str, fee: &BigDecimal) -> Result<BigDecimal, RuleError> {
        if self.percentage < BigDecimal::zero() || self.percentage > BigDecimal::from(1) {
            return Err(RuleError::InvalidParameter {
                rule: rule.to_string(),
                message: format!("percentage {} outside 0..=1", self.percentage),
            });
        }
        if self.cap < BigDecimal::zero() {
            return Err(RuleError::InvalidParameter {
                rule: rule.to_string(),
                message: format!("negative cap {}", self.cap),
            });
        }
        let share = fee * &self.percentage;
        Ok(if share > self.cap {
            self.cap.clone()
        } else {
            share
        })
    }
}

/// The behavior of one billing rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuleKind {
    /// Late entries, DNS and chip rental: runner pays 100%
    SpecificFeePassThrough,
    /// SM competitions: club pays the full standard start fee
    ChampionshipFullCoverage,
    /// Standard fees for non-SM competitions starting within the window:
    /// runner pays 100%
    SeasonalPassThrough { start: NaiveDate, end: NaiveDate },
    /// Standard fees for runners up to `max_age`: club pays 100%
    YouthFullCoverage { max_age: i32 },
    /// Standard fees for runners in the junior age band: shared split
    JuniorFeeShare {
        min_age: i32,
        max_age: i32,
        share: FeeShare,
    },
    /// Standard-fee catch-all: runner pays `min(fee * percentage, cap)`
    DefaultFeeShare { share: FeeShare },
}

/// One configured billing rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier
    pub id: String,
    /// Display name shown in the billing basis output
    pub name: String,
    /// Longer explanation for rule editors
    pub description: String,
    /// Evaluation order; lower numbers run first
    pub priority: i32,
    /// Condition/action behavior with its parameters
    pub kind: RuleKind,
}

impl Rule {
    /// Evaluate the rule's condition against one fee record
    pub fn matches(&self, record: &FeeRecord) -> Result<bool, RuleError> {
        match &self.kind {
            RuleKind::SpecificFeePassThrough => Ok(matches!(
                record.fee_type,
                FeeType::Late | FeeType::Dns | FeeType::ChipRental
            )),
            RuleKind::ChampionshipFullCoverage => {
                Ok(record.is_championship && record.fee_type == FeeType::Standard)
            }
            RuleKind::SeasonalPassThrough { start, end } => {
                if end < start {
                    return Err(RuleError::InvalidParameter {
                        rule: self.id.clone(),
                        message: format!("season window {} - {} is inverted", start, end),
                    });
                }
                if record.fee_type != FeeType::Standard || record.is_championship {
                    return Ok(false);
                }
                Ok(record
                    .competition_start_date()
                    .map(|day| *start <= day && day <= *end)
                    .unwrap_or(false))
            }
            RuleKind::YouthFullCoverage { max_age } => Ok(record.fee_type == FeeType::Standard
                && record.age.map(|age| age <= *max_age).unwrap_or(false)),
            RuleKind::JuniorFeeShare {
                min_age, max_age, ..
            } => {
                if max_age < min_age {
                    return Err(RuleError::InvalidParameter {
                        rule: self.id.clone(),
                        message: format!("age band {}..={} is inverted", min_age, max_age),
                    });
                }
                Ok(record.fee_type == FeeType::Standard
                    && record
                        .age
                        .map(|age| *min_age <= age && age <= *max_age)
                        .unwrap_or(false))
            }
            RuleKind::DefaultFeeShare { .. } => Ok(record.fee_type == FeeType::Standard),
        }
    }

    /// Compute the rule's raw split for a record whose condition matched
    pub fn split(&self, record: &FeeRecord) -> Result<Split, RuleError> {
        let fee = &record.fee_amount;
        match &self.kind {
            RuleKind::SpecificFeePassThrough | RuleKind::SeasonalPassThrough { .. } => {
                Ok(Split::runner_full(fee))
            }
            RuleKind::ChampionshipFullCoverage | RuleKind::YouthFullCoverage { .. } => {
                Ok(Split::club_full(fee))
            }
            RuleKind::JuniorFeeShare { share, .. } | RuleKind::DefaultFeeShare { share } => {
                let runner_pays = share.runner_share(&self.id, fee)?;
                let club_pays = fee - &runner_pays;
                Ok(Split {
                    runner_pays,
                    club_pays,
                })
            }
        }
    }
}

/// An ordered rule list, sorted ascending by priority on construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set, sorting by ascending priority. The sort is stable,
    /// so rules sharing a priority keep their given order.
    pub fn new(mut rules: Vec<Rule>) -> Self {
        rules.sort_by_key(|rule| rule.priority);
        Self { rules }
    }

    /// Rules in evaluation order
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

//! Rule evaluation engine
//!
//! First-match-wins over an ordered rule set: the lowest-priority-number
//! rule whose condition holds decides the runner/club split, and no further
//! rules are consulted. A rule that errors is logged and skipped, so one bad
//! rule never aborts a batch.

use bigdecimal::{BigDecimal, Zero};

use crate::billing::rules::{RuleSet, Split};
use crate::traits::RuleConfigStore;
use crate::types::{BilledRecord, BillingResult, FeeRecord};
use crate::utils::rounding::round2;
use crate::utils::validation::validate_rule_config;

/// Rule name recorded when no configured rule matches
pub const DEFAULT_RULE_NAME: &str = "Default: runner pays full amount";

/// Batch billing engine bound to a rule configuration store.
///
/// Configuration is snapshotted once per batch, so a parameter update that
/// lands mid-run only affects the next batch.
pub struct BillingEngine<S: RuleConfigStore> {
    store: S,
}

impl<S: RuleConfigStore> BillingEngine<S> {
    /// Create an engine reading rule parameters from the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Bill a batch of fee records with a fresh configuration snapshot.
    ///
    /// A configuration that cannot be loaded or fails validation is the only
    /// batch-aborting error; everything per-record is recovered locally.
    pub async fn bill(&self, records: Vec<FeeRecord>) -> BillingResult<Vec<BilledRecord>> {
        let config = self.store.load().await?;
        validate_rule_config(&config)?;
        let rules = config.build_rule_set();
        Ok(apply_rules(&rules, records))
    }
}

/// Bill every record in the batch against an already-built rule set
pub fn apply_rules(rules: &RuleSet, records: Vec<FeeRecord>) -> Vec<BilledRecord> {
    let billed: Vec<BilledRecord> = records
        .into_iter()
        .map(|record| bill_record(rules, record))
        .collect();
    tracing::info!(records = billed.len(), "billing batch complete");
    billed
}

/// Bill a single fee record: first matching rule wins, default fallback is
/// "runner pays the full amount"
pub fn bill_record(rules: &RuleSet, record: FeeRecord) -> BilledRecord {
    for rule in rules.iter() {
        match rule.matches(&record) {
            Ok(false) => continue,
            Ok(true) => match rule.split(&record) {
                Ok(split) => {
                    tracing::debug!(
                        rule = %rule.name,
                        member = %record.member_name,
                        competition = %record.competition_name,
                        "applied billing rule"
                    );
                    return finalize(record, split, &rule.name);
                }
                Err(error) => {
                    tracing::warn!(rule = %rule.id, %error, "rule action failed, skipping rule");
                    continue;
                }
            },
            Err(error) => {
                tracing::warn!(rule = %rule.id, %error, "rule condition failed, skipping rule");
                continue;
            }
        }
    }

    let fee = record.fee_amount.clone();
    finalize(record, Split::runner_full(&fee), DEFAULT_RULE_NAME)
}

/// Clamp and round a raw split so that `0 <= runner_pays <= fee_amount` and
/// `runner_pays + club_pays == fee_amount` at 2 decimals.
///
/// Rounding is half-up (ties round away from zero), applied to the runner's
/// share; the club share is the exact remainder.
fn finalize(record: FeeRecord, split: Split, rule_name: &str) -> BilledRecord {
    let fee = round2(&record.fee_amount);
    let mut runner_pays = round2(&split.runner_pays);
    if runner_pays < BigDecimal::zero() {
        runner_pays = BigDecimal::zero();
    } else if runner_pays > fee {
        runner_pays = fee.clone();
    }
    let club_pays = &fee - &runner_pays;

    BilledRecord {
        record,
        runner_pays,
        club_pays,
        applied_rule: rule_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::config::RuleSetConfig;
    use crate::billing::rules::{FeeShare, Rule, RuleKind};
    use crate::types::FeeType;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn default_rules() -> RuleSet {
        RuleSetConfig::default().build_rule_set()
    }

    fn record(fee_type: FeeType, amount: i64) -> FeeRecord {
        FeeRecord::new(
            "Test Runner",
            "Vårserien deltävling 2",
            "2024-05-12",
            "H21",
            fee_type,
            BigDecimal::from(amount),
        )
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn dns_fee_passes_through_to_runner() {
        let billed = bill_record(&default_rules(), record(FeeType::Dns, 300));
        assert_eq!(billed.runner_pays, BigDecimal::from(300));
        assert_eq!(billed.club_pays, BigDecimal::from(0));
        assert_eq!(
            billed.applied_rule,
            "Runner Pays Full for Specific Fee Types"
        );
    }

    #[test]
    fn championship_standard_fee_is_club_covered() {
        let mut rec = record(FeeType::Standard, 250);
        rec.is_championship = true;
        let billed = bill_record(&default_rules(), rec);
        assert_eq!(billed.runner_pays, BigDecimal::from(0));
        assert_eq!(billed.club_pays, BigDecimal::from(250));
        assert_eq!(billed.applied_rule, "SM Competition Full Fee Coverage");
    }

    #[test]
    fn youth_standard_fee_is_club_covered() {
        let rec = record(FeeType::Standard, 500).with_age(15);
        let billed = bill_record(&default_rules(), rec);
        assert_eq!(billed.runner_pays, BigDecimal::from(0));
        assert_eq!(billed.club_pays, BigDecimal::from(500));
        assert_eq!(billed.applied_rule, "Ungdom & Junior, fri startavgift");
    }

    #[test]
    fn summer_event_pass_through_beats_youth_and_share() {
        let mut rec = record(FeeType::Standard, 140).with_age(15);
        rec.competition_date = "2024-07-06".to_string();
        let billed = bill_record(&default_rules(), rec);
        // priority 35 seasonal wins over priority 40 youth
        assert_eq!(billed.runner_pays, BigDecimal::from(140));
        assert!(billed.applied_rule.starts_with("Runner Pays Full for Summer"));
    }

    #[test]
    fn junior_gets_fifty_percent_share() {
        let rec = record(FeeType::Standard, 180).with_age(19);
        let billed = bill_record(&default_rules(), rec);
        assert_eq!(billed.runner_pays, BigDecimal::from(90));
        assert_eq!(billed.club_pays, BigDecimal::from(90));
        assert_eq!(billed.applied_rule, "Subvention junior");
    }

    #[test]
    fn default_share_cap_is_enforced() {
        let billed = bill_record(&default_rules(), record(FeeType::Standard, 1000));
        // 60% of 1000 = 600, capped at 120
        assert_eq!(billed.runner_pays, BigDecimal::from(120));
        assert_eq!(billed.club_pays, BigDecimal::from(880));
    }

    #[test]
    fn default_share_below_cap() {
        let billed = bill_record(&default_rules(), record(FeeType::Standard, 100));
        assert_eq!(billed.runner_pays, BigDecimal::from(60));
        assert_eq!(billed.club_pays, BigDecimal::from(40));
    }

    #[test]
    fn share_rounds_half_up_to_two_decimals() {
        let mut rec = record(FeeType::Standard, 0);
        rec.fee_amount = dec("33.33");
        let billed = bill_record(&default_rules(), rec);
        // 33.33 * 0.6 = 19.998 -> 20.00
        assert_eq!(billed.runner_pays, dec("20.00"));
        assert_eq!(billed.club_pays, dec("13.33"));
    }

    #[test]
    fn split_always_sums_to_fee() {
        let rules = default_rules();
        let amounts = ["140", "33.33", "0.01", "999.99", "0"];
        let ages = [None, Some(10), Some(16), Some(17), Some(20), Some(45)];
        for amount in amounts {
            for age in ages {
                let mut rec = record(FeeType::Standard, 0);
                rec.fee_amount = dec(amount);
                rec.age = age;
                let billed = bill_record(&rules, rec);
                assert_eq!(
                    &billed.runner_pays + &billed.club_pays,
                    dec(amount),
                    "split must sum to fee for amount {} age {:?}",
                    amount,
                    age
                );
                assert!(billed.runner_pays >= BigDecimal::from(0));
                assert!(billed.club_pays >= BigDecimal::from(0));
            }
        }
    }

    #[test]
    fn no_matching_rule_falls_back_to_default() {
        // an empty rule set matches nothing
        let billed = bill_record(&RuleSet::new(vec![]), record(FeeType::Standard, 140));
        assert_eq!(billed.runner_pays, BigDecimal::from(140));
        assert_eq!(billed.club_pays, BigDecimal::from(0));
        assert_eq!(billed.applied_rule, DEFAULT_RULE_NAME);
    }

    #[test]
    fn first_match_wins_between_two_matching_rules() {
        let rules = RuleSet::new(vec![
            Rule {
                id: "second".to_string(),
                name: "Second".to_string(),
                description: String::new(),
                priority: 20,
                kind: RuleKind::DefaultFeeShare {
                    share: FeeShare {
                        percentage: dec("1"),
                        cap: BigDecimal::from(10_000),
                    },
                },
            },
            Rule {
                id: "first".to_string(),
                name: "First".to_string(),
                description: String::new(),
                priority: 5,
                kind: RuleKind::DefaultFeeShare {
                    share: FeeShare {
                        percentage: dec("0"),
                        cap: BigDecimal::from(10_000),
                    },
                },
            },
        ]);
        let billed = bill_record(&rules, record(FeeType::Standard, 140));
        assert_eq!(billed.applied_rule, "First");
        assert_eq!(billed.runner_pays, BigDecimal::from(0));
    }

    #[test]
    fn failing_rule_is_skipped_not_fatal() {
        let rules = RuleSet::new(vec![
            Rule {
                id: "broken".to_string(),
                name: "Broken seasonal".to_string(),
                description: String::new(),
                priority: 1,
                kind: RuleKind::SeasonalPassThrough {
                    start: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
                    end: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
                },
            },
            Rule {
                id: "fallback".to_string(),
                name: "Fallback share".to_string(),
                description: String::new(),
                priority: 2,
                kind: RuleKind::DefaultFeeShare {
                    share: FeeShare {
                        percentage: dec("0.5"),
                        cap: BigDecimal::from(1_000),
                    },
                },
            },
        ]);
        let billed = bill_record(&rules, record(FeeType::Standard, 200));
        assert_eq!(billed.applied_rule, "Fallback share");
        assert_eq!(billed.runner_pays, BigDecimal::from(100));
    }

    #[test]
    fn clamps_runner_share_to_fee() {
        // a 100% share with a huge cap can never exceed the fee itself
        let rules = RuleSet::new(vec![Rule {
            id: "full".to_string(),
            name: "Full".to_string(),
            description: String::new(),
            priority: 1,
            kind: RuleKind::DefaultFeeShare {
                share: FeeShare {
                    percentage: dec("1"),
                    cap: BigDecimal::from(1_000_000),
                },
            },
        }]);
        let billed = bill_record(&rules, record(FeeType::Standard, 140));
        assert_eq!(billed.runner_pays, BigDecimal::from(140));
        assert_eq!(billed.club_pays, BigDecimal::from(0));
    }

    #[test]
    fn billing_is_idempotent() {
        let rules = default_rules();
        let records: Vec<FeeRecord> = vec![
            record(FeeType::Standard, 140).with_age(15),
            record(FeeType::Late, 70),
            record(FeeType::Standard, 1000),
        ];
        let first = apply_rules(&rules, records.clone());
        let second = apply_rules(&rules, records);
        assert_eq!(first, second);
    }
}

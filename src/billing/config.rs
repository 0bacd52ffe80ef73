//! Rule parameter configuration
//!
//! Parameters are loaded through a [`crate::traits::RuleConfigStore`] at the
//! start of every batch, so changes take effect on the next run without a
//! process restart. Every field carries a serde default: a missing section
//! falls back to the documented club policy instead of failing the batch.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::billing::rules::{FeeShare, Rule, RuleKind, RuleSet};

fn decimal(digits: i64, scale: i64) -> BigDecimal {
    BigDecimal::new(digits.into(), scale)
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Date window for the seasonal pass-through rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalConfig {
    /// First day of the season window (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the season window (inclusive)
    pub end_date: NaiveDate,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            start_date: ymd(2024, 6, 15),
            end_date: ymd(2024, 8, 15),
        }
    }
}

/// Age cutoff for the youth full-coverage rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YouthConfig {
    /// Youths are covered through the year they turn this age
    pub max_age: i32,
}

impl Default for YouthConfig {
    fn default() -> Self {
        Self { max_age: 16 }
    }
}

/// Parameters for the junior fee-share rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JuniorShareConfig {
    /// Whether the junior rule participates in evaluation at all
    pub enabled: bool,
    /// First age of the junior band (inclusive)
    pub min_age: i32,
    /// Last age of the junior band (inclusive)
    pub max_age: i32,
    /// Share of the fee the junior pays, 0..=1
    pub percentage: BigDecimal,
    /// Upper bound on the junior's share in SEK
    pub cap_amount: BigDecimal,
}

impl Default for JuniorShareConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_age: 17,
            max_age: 20,
            percentage: decimal(5, 1),
            cap_amount: BigDecimal::from(200),
        }
    }
}

/// Parameters for the catch-all member fee-share rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeShareConfig {
    /// Share of the fee the runner pays, 0..=1
    pub percentage: BigDecimal,
    /// Upper bound on the runner's share in SEK
    pub cap_amount: BigDecimal,
}

impl Default for FeeShareConfig {
    fn default() -> Self {
        Self {
            percentage: decimal(6, 1),
            cap_amount: BigDecimal::from(120),
        }
    }
}

/// Complete, reloadable rule parameter set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSetConfig {
    /// Seasonal pass-through window (priority 35)
    pub seasonal_pass_through: SeasonalConfig,
    /// Youth full coverage (priority 40)
    pub youth_full_coverage: YouthConfig,
    /// Junior fee share (priority 50)
    pub junior_fee_share: JuniorShareConfig,
    /// Default member fee share (priority 100)
    pub default_fee_share: FeeShareConfig,
}

impl RuleSetConfig {
    /// Build the ordered rule set this configuration describes.
    ///
    /// Rule names embed the live parameter values, matching what the club
    /// treasurer sees in the exported billing basis.
    pub fn build_rule_set(&self) -> RuleSet {
        let mut rules = vec![
            Rule {
                id: "runner_pays_full_specific_fees".to_string(),
                name: "Runner Pays Full for Specific Fee Types".to_string(),
                description: "Runner pays 100% for late entries, Did Not Start (DNS), \
                              and chip rental fees."
                    .to_string(),
                priority: 10,
                kind: RuleKind::SpecificFeePassThrough,
            },
            Rule {
                id: "sm_competition_full_coverage".to_string(),
                name: "SM Competition Full Fee Coverage".to_string(),
                description: "Club pays the full start fee for all members participating \
                              in SM (Swedish Championship) competitions."
                    .to_string(),
                priority: 30,
                kind: RuleKind::ChampionshipFullCoverage,
            },
            Rule {
                id: "summer_event_fee".to_string(),
                name: format!(
                    "Runner Pays Full for Summer Period Events ({} - {})",
                    self.seasonal_pass_through.start_date, self.seasonal_pass_through.end_date
                ),
                description: format!(
                    "Runner pays the full start fee for events during the summer period \
                     ({} - {}).",
                    self.seasonal_pass_through.start_date, self.seasonal_pass_through.end_date
                ),
                priority: 35,
                kind: RuleKind::SeasonalPassThrough {
                    start: self.seasonal_pass_through.start_date,
                    end: self.seasonal_pass_through.end_date,
                },
            },
            Rule {
                id: "youth_junior_free_fee".to_string(),
                name: "Ungdom & Junior, fri startavgift".to_string(),
                description: "Klubben betalar full startavgift för ungdom.".to_string(),
                priority: 40,
                kind: RuleKind::YouthFullCoverage {
                    max_age: self.youth_full_coverage.max_age,
                },
            },
            Rule {
                id: "other_members_fee_share".to_string(),
                name: format!(
                    "Other Members Fee Share ({}%, max {} SEK)",
                    percent_display(&self.default_fee_share.percentage),
                    self.default_fee_share.cap_amount
                ),
                description: format!(
                    "For standard start fees, other members pay {}% of the fee, up to a \
                     maximum of {} SEK. The club pays the rest.",
                    percent_display(&self.default_fee_share.percentage),
                    self.default_fee_share.cap_amount
                ),
                priority: 100,
                kind: RuleKind::DefaultFeeShare {
                    share: FeeShare {
                        percentage: self.default_fee_share.percentage.clone(),
                        cap: self.default_fee_share.cap_amount.clone(),
                    },
                },
            },
        ];

        if self.junior_fee_share.enabled {
            rules.push(Rule {
                id: "junior_fee_share".to_string(),
                name: "Subvention junior".to_string(),
                description: format!(
                    "För normala startavgifter betalar junior {}% av avgiften, upp till \
                     maximalt {} kr. Klubben betalar resten.",
                    percent_display(&self.junior_fee_share.percentage),
                    self.junior_fee_share.cap_amount
                ),
                priority: 50,
                kind: RuleKind::JuniorFeeShare {
                    min_age: self.junior_fee_share.min_age,
                    max_age: self.junior_fee_share.max_age,
                    share: FeeShare {
                        percentage: self.junior_fee_share.percentage.clone(),
                        cap: self.junior_fee_share.cap_amount.clone(),
                    },
                },
            });
        }

        RuleSet::new(rules)
    }
}

fn percent_display(fraction: &BigDecimal) -> BigDecimal {
    (fraction * BigDecimal::from(100)).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_six_rules_in_priority_order() {
        let rules = RuleSetConfig::default().build_rule_set();
        let priorities: Vec<i32> = rules.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![10, 30, 35, 40, 50, 100]);
    }

    #[test]
    fn disabled_junior_rule_is_omitted() {
        let config = RuleSetConfig {
            junior_fee_share: JuniorShareConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let rules = config.build_rule_set();
        assert_eq!(rules.len(), 5);
        assert!(rules.iter().all(|r| r.id != "junior_fee_share"));
    }

    #[test]
    fn rule_names_embed_parameters() {
        let rules = RuleSetConfig::default().build_rule_set();
        let default_share = rules
            .iter()
            .find(|r| r.id == "other_members_fee_share")
            .unwrap();
        assert_eq!(
            default_share.name,
            "Other Members Fee Share (60%, max 120 SEK)"
        );
        let seasonal = rules.iter().find(|r| r.id == "summer_event_fee").unwrap();
        assert!(seasonal.name.contains("2024-06-15 - 2024-08-15"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: RuleSetConfig =
            serde_json::from_str(r#"{"youth_full_coverage": {"max_age": 20}}"#).unwrap();
        assert_eq!(config.youth_full_coverage.max_age, 20);
        assert_eq!(config.default_fee_share, FeeShareConfig::default());
        assert_eq!(config.junior_fee_share.min_age, 17);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = RuleSetConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RuleSetConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}

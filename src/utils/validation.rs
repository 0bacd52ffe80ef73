//! Validation utilities

use bigdecimal::BigDecimal;

use crate::billing::config::RuleSetConfig;
use crate::types::{BillingError, BillingResult, FeeRecord};

/// Validate a fee record before billing
pub fn validate_fee_record(record: &FeeRecord) -> BillingResult<()> {
    if record.member_name.trim().is_empty() {
        return Err(BillingError::Validation(
            "Member name cannot be empty".to_string(),
        ));
    }

    if record.competition_name.trim().is_empty() {
        return Err(BillingError::Validation(
            "Competition name cannot be empty".to_string(),
        ));
    }

    if record.fee_amount < BigDecimal::from(0) {
        return Err(BillingError::Validation(format!(
            "Fee amount cannot be negative: {}",
            record.fee_amount
        )));
    }

    Ok(())
}

fn validate_share(section: &str, percentage: &BigDecimal, cap: &BigDecimal) -> BillingResult<()> {
    if *percentage < BigDecimal::from(0) || *percentage > BigDecimal::from(1) {
        return Err(BillingError::Config(format!(
            "{}: percentage {} must be within 0..=1",
            section, percentage
        )));
    }

    if *cap < BigDecimal::from(0) {
        return Err(BillingError::Config(format!(
            "{}: cap amount {} cannot be negative",
            section, cap
        )));
    }

    Ok(())
}

/// Validate a complete rule parameter set before a batch run.
///
/// A configuration that fails here aborts the batch; per-rule runtime
/// failures are handled inside the engine instead.
pub fn validate_rule_config(config: &RuleSetConfig) -> BillingResult<()> {
    let seasonal = &config.seasonal_pass_through;
    if seasonal.end_date < seasonal.start_date {
        return Err(BillingError::Config(format!(
            "seasonal_pass_through: window {} - {} is inverted",
            seasonal.start_date, seasonal.end_date
        )));
    }

    if config.youth_full_coverage.max_age < 0 {
        return Err(BillingError::Config(format!(
            "youth_full_coverage: max age {} cannot be negative",
            config.youth_full_coverage.max_age
        )));
    }

    let junior = &config.junior_fee_share;
    if junior.enabled {
        if junior.min_age < 0 || junior.max_age < junior.min_age {
            return Err(BillingError::Config(format!(
                "junior_fee_share: age band {}..={} is invalid",
                junior.min_age, junior.max_age
            )));
        }
        validate_share("junior_fee_share", &junior.percentage, &junior.cap_amount)?;
    }

    validate_share(
        "default_fee_share",
        &config.default_fee_share.percentage,
        &config.default_fee_share.cap_amount,
    )?;

    Ok(())
}

//! Competition date parsing
//!
//! Eventor exports carry either a single day (`2024-07-01`) or a multi-day
//! span (`2024-07-01 - 2024-07-03`). Both parse into an inclusive
//! day-granularity [`DateRange`]; comparing whole days is equivalent to the
//! 00:00:00..23:59:59 framing of the source data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a single `YYYY-MM-DD` day
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Inclusive day range covering one competition occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First competition day
    pub start: NaiveDate,
    /// Last competition day (equal to `start` for single-day events)
    pub end: NaiveDate,
}

impl DateRange {
    /// Range covering a single day
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Parse a raw competition date field. Returns `None` when either part
    /// is not a valid `YYYY-MM-DD` date or the range is inverted; callers
    /// exclude such competitions from date-dependent matching.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some((first, second)) = raw.split_once(" - ") {
            let start = parse_day(first)?;
            let end = parse_day(second)?;
            if end < start {
                return None;
            }
            Some(Self { start, end })
        } else {
            parse_day(raw).map(Self::single)
        }
    }

    /// Whether the given day falls within the range, inclusive on both ends
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

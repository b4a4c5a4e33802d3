//! Retention age: how long audit records are kept.
//!
//! Written in configuration as `"<amount> <UNIT>"`, e.g. `"1 MONTH"` or
//! `"2 weeks"`. Months and years are calendar arithmetic, so one month
//! before 31 March is the last day of February.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChangelogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeUnit {
    Day,
    Week,
    Month,
    Year,
}

impl AgeUnit {
    fn as_str(&self) -> &'static str {
        match self {
            AgeUnit::Day => "DAY",
            AgeUnit::Week => "WEEK",
            AgeUnit::Month => "MONTH",
            AgeUnit::Year => "YEAR",
        }
    }
}

/// A maximum record age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionAge {
    pub amount: u32,
    pub unit: AgeUnit,
}

impl RetentionAge {
    pub fn new(amount: u32, unit: AgeUnit) -> Self {
        Self { amount, unit }
    }

    /// The oldest timestamp that survives a sweep run at `now`.
    ///
    /// Records strictly older than the cutoff are deleted. Returns `None`
    /// when the arithmetic falls outside the representable range.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.unit {
            AgeUnit::Day => now.checked_sub_signed(Duration::days(i64::from(self.amount))),
            AgeUnit::Week => now.checked_sub_signed(Duration::weeks(i64::from(self.amount))),
            AgeUnit::Month => now.checked_sub_months(Months::new(self.amount)),
            AgeUnit::Year => now.checked_sub_months(Months::new(self.amount.checked_mul(12)?)),
        }
    }
}

impl fmt::Display for RetentionAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit.as_str())
    }
}

impl FromStr for RetentionAge {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ChangelogError::ConfigError {
            reason: format!("invalid retention age '{}': {}", s, reason),
        };

        let mut parts = s.split_whitespace();
        let (Some(amount), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected '<amount> <unit>'"));
        };

        let amount: u32 = amount
            .parse()
            .map_err(|_| invalid("amount must be a positive integer"))?;
        if amount == 0 {
            return Err(invalid("amount must be greater than zero"));
        }

        let unit = match unit.to_ascii_uppercase().trim_end_matches('S') {
            "DAY" => AgeUnit::Day,
            "WEEK" => AgeUnit::Week,
            "MONTH" => AgeUnit::Month,
            "YEAR" => AgeUnit::Year,
            _ => return Err(invalid("unit must be DAY, WEEK, MONTH or YEAR")),
        };

        Ok(Self { amount, unit })
    }
}

//! Time classification relative to an explicit reference instant.
//!
//! Everything here is a pure function of `now` and a timestamp. The canonical
//! calendar is UTC: "today" means the same UTC date as `now`, whatever zone
//! the caller happens to be in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Parses a record timestamp.
///
/// Accepts RFC 3339 (`2024-01-15T10:30:00Z`), a naive date-time taken as UTC
/// (`2024-01-15T10:30:00`), or a bare date taken as UTC midnight
/// (`2024-01-15`).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, QueryError> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| QueryError::InvalidTimestamp {
            value: s.to_string(),
        })
}

/// Time-window constraint of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    /// No constraint.
    #[default]
    #[serde(rename = "all")]
    All,
    /// Same UTC calendar date as `now`.
    #[serde(rename = "today")]
    Today,
    /// At most 7 days before `now`, inclusive.
    #[serde(rename = "last-7-days", alias = "week")]
    Last7Days,
    /// At most 30 days before `now`, inclusive.
    #[serde(rename = "last-30-days", alias = "month")]
    Last30Days,
}

impl TimeWindow {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Last7Days => "last-7-days",
            Self::Last30Days => "last-30-days",
        }
    }

    /// Whether `timestamp` falls inside this window as seen from `now`.
    ///
    /// The day windows compare the raw difference against N days with
    /// millisecond resolution, so a record exactly N days old is inside.
    pub fn contains(self, now: DateTime<Utc>, timestamp: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Today => now.date_naive() == timestamp.date_naive(),
            Self::Last7Days => within_days(now, timestamp, 7),
            Self::Last30Days => within_days(now, timestamp, 30),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "last-7-days" | "week" => Ok(Self::Last7Days),
            "last-30-days" | "month" => Ok(Self::Last30Days),
            _ => Err(QueryError::InvalidWindow {
                value: s.to_string(),
            }),
        }
    }
}

fn within_days(now: DateTime<Utc>, timestamp: DateTime<Utc>, days: i64) -> bool {
    now.signed_duration_since(timestamp) <= TimeDelta::days(days)
}

/// Coarse age category of a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    Today,
    #[serde(rename = "last-7-days")]
    Last7Days,
    #[serde(rename = "last-30-days")]
    Last30Days,
    Older,
}

impl Bucket {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Last7Days => "last-7-days",
            Self::Last30Days => "last-30-days",
            Self::Older => "older",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies `timestamp` into the finest bucket that holds it.
///
/// Timestamps after `now` are treated as happening at `now`.
pub fn bucket(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> Bucket {
    let timestamp = timestamp.min(now);
    if now.date_naive() == timestamp.date_naive() {
        Bucket::Today
    } else if within_days(now, timestamp, 7) {
        Bucket::Last7Days
    } else if within_days(now, timestamp, 30) {
        Bucket::Last30Days
    } else {
        Bucket::Older
    }
}

/// Renders the age of `timestamp` as "N minutes/hours/days ago".
///
/// Units are floored and never singularised. A future timestamp reads as
/// "0 minutes ago".
pub fn relative_label(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> String {
    let diff_ms = now.signed_duration_since(timestamp).num_milliseconds().max(0);
    let hours = diff_ms / MS_PER_HOUR;

    if hours < 1 {
        format!("{} minutes ago", diff_ms / MS_PER_MINUTE)
    } else if hours < 24 {
        format!("{hours} hours ago")
    } else {
        format!("{} days ago", hours / 24)
    }
}

//! Shared utilities for CLI commands.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use fq_core::{FilterSpec, Record, RecordStore, SortSpec, TimeWindow};
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::QueryArgs;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as either ISO 8601 or relative time.
///
/// Supports:
/// - ISO 8601: "2025-03-14T10:30:00Z", "2025-03-14T10:30:00" (UTC)
/// - Bare dates, as UTC midnight: "2025-03-14"
/// - Relative to `clock`: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, clock: DateTime<Utc>) -> Result<DateTime<Utc>> {
    // Try absolute forms first, read the same way as record timestamps
    if let Ok(dt) = fq_core::parse_timestamp(s) {
        return Ok(dt);
    }

    // Try relative time: "N hours/minutes/days/weeks ago"
    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2025-03-14T10:30:00Z) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    let duration = Duration::minutes(n * minutes_per_unit);
    Ok(clock - duration)
}

/// Splits a `FIELD=VALUE` argument.
pub fn parse_field_filter(arg: &str) -> Result<(&str, &str)> {
    let Some((field, value)) = arg.split_once('=') else {
        anyhow::bail!("Invalid filter: {arg}. Expected FIELD=VALUE (e.g., status=active)");
    };
    let field = field.trim();
    if field.is_empty() {
        anyhow::bail!("Invalid filter: {arg}. Field name is empty");
    }
    Ok((field, value.trim()))
}

/// Reads a JSON array of records.
pub fn load_records<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse records in {}", path.display()))
}

/// Builds a store from `path` if given, otherwise from `sample`.
///
/// Records with malformed timestamps are kept but reported, since they drop
/// out of every time window.
pub fn load_store<R, F>(path: Option<&Path>, sample: F) -> Result<RecordStore<R>>
where
    R: Record + DeserializeOwned,
    F: FnOnce() -> Vec<R>,
{
    let records = match path {
        Some(path) => {
            let records = load_records(path)?;
            tracing::debug!(path = %path.display(), count = records.len(), "loaded records");
            records
        }
        None => sample(),
    };

    let store = RecordStore::new(records).context("invalid record snapshot")?;
    for (record, err) in store.timestamp_errors() {
        tracing::warn!(id = %record.id(), %err, "record has a malformed timestamp");
    }
    Ok(store)
}

/// Resolves the sort to apply: `--sort` wins, then the configured default.
///
/// A bare `--asc`/`--desc` flips the configured default's direction.
pub fn resolve_sort(args: &QueryArgs, default: Option<&SortSpec>) -> Option<SortSpec> {
    match (&args.sort, default) {
        (Some(field), _) => Some(SortSpec::new(
            field.clone(),
            args.direction().unwrap_or_default(),
        )),
        (None, Some(default)) => Some(SortSpec {
            direction: args.direction().unwrap_or(default.direction),
            ..default.clone()
        }),
        (None, None) => None,
    }
}

/// Builds the shared part of a filter from the command line.
pub fn base_filter(args: &QueryArgs, default_window: TimeWindow) -> Result<FilterSpec> {
    let mut spec = FilterSpec::new().within(args.window.unwrap_or(default_window));
    if let Some(search) = &args.search {
        spec = spec.search(search.clone());
    }
    for arg in &args.filters {
        let (field, value) = parse_field_filter(arg)?;
        spec = spec.with(field, value);
    }
    Ok(spec)
}

/// Checks a shorthand flag value against a closed set, passing `all` through.
pub fn check_choice<T>(flag: &str, value: &str, choices: &[T]) -> Result<()>
where
    T: FromStr + fmt::Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if value == "all" {
        return Ok(());
    }
    value.parse::<T>().map(drop).with_context(|| {
        let choices: Vec<String> = choices.iter().map(ToString::to_string).collect();
        format!("{flag} must be one of {} or all", choices.join(", "))
    })
}

/// Truncates to `max` characters, marking the cut with "...".
pub fn truncate(s: &str, max: usize) -> String {
    // Count characters, not bytes, to avoid panics on multi-byte UTF-8
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max.saturating_sub(3)).collect::<String>())
    } else {
        s.to_string()
    }
}

//! History command for browsing the activity log.
//!
//! Each row carries an "N hours ago" label computed against the same `now`
//! that anchors the time window.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use fq_core::{
    ActivityKind, ActivityRecord, ActivitySummary, Bucket, FilterSpec, Record, RecordStore,
    SortSpec, bucket, query, relative_label,
};
use serde::Serialize;

use super::util::{base_filter, check_choice, resolve_sort, truncate};
use crate::{Config, HistoryArgs};

/// Builds the filter for `fq history`.
///
/// `--type` is a shorthand for `type=...` and `--favorites` for
/// `isFavorite=true`.
pub fn build_filter(args: &HistoryArgs, config: &Config) -> Result<FilterSpec> {
    let mut spec = base_filter(&args.query, config.default_window)?;
    if let Some(kind) = &args.kind {
        check_choice("--type", kind, ActivityKind::ALL)?;
        spec = spec.with("type", kind.as_str());
    }
    if args.favorites {
        spec = spec.with("isFavorite", "true");
    }
    Ok(spec)
}

// ========== Activity Data ==========

/// An activity with its age resolved against `now`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry<'a> {
    #[serde(flatten)]
    pub record: &'a ActivityRecord,
    /// `None` when the timestamp can't be parsed.
    pub relative_time: Option<String>,
    pub bucket: Option<Bucket>,
}

impl<'a> HistoryEntry<'a> {
    pub fn new(record: &'a ActivityRecord, now: DateTime<Utc>) -> Self {
        let timestamp = record.timestamp().ok();
        Self {
            record,
            relative_time: timestamp.map(|ts| relative_label(now, ts)),
            bucket: timestamp.map(|ts| bucket(now, ts)),
        }
    }
}

// ========== Human-Readable Output ==========

/// Format activities as a table.
pub fn format_history(entries: &[HistoryEntry<'_>], total: usize) -> String {
    let mut output = String::new();

    writeln!(output, "HISTORY ({} of {total} activities)", entries.len()).unwrap();
    writeln!(output).unwrap();

    if entries.is_empty() {
        writeln!(output, "No activities match.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<6}  {:<13}  {:<10}  {:<14}  {:>7}  {:<3}  Title",
        "ID", "Type", "Status", "When", "Results", "Fav"
    )
    .unwrap();
    writeln!(
        output,
        "──────  ─────────────  ──────────  ──────────────  ───────  ───  ────────────────────────────────────────"
    )
    .unwrap();

    for entry in entries {
        let record = entry.record;
        let id_short: String = record.id.as_str().chars().take(6).collect();
        let when = entry.relative_time.as_deref().unwrap_or("unknown");
        let results = record
            .result_count
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let favorite = if record.is_favorite { "★" } else { "" };

        writeln!(
            output,
            "{:<6}  {:<13}  {:<10}  {:<14}  {:>7}  {:<3}  {}",
            id_short,
            record.kind.as_str(),
            record.status.as_str(),
            when,
            results,
            favorite,
            truncate(&record.title, 40)
        )
        .unwrap();
    }

    output
}

/// Format the summary block printed under the table.
pub fn format_summary(summary: &ActivitySummary) -> String {
    let mut output = String::new();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "  {:<18}{}", "Total activities", summary.total).unwrap();
    writeln!(output, "  {:<18}{}", "Queries", summary.queries).unwrap();
    writeln!(output, "  {:<18}{}", "Visualizations", summary.visualizations).unwrap();
    writeln!(output, "  {:<18}{}", "Favorites", summary.favorites).unwrap();
    output
}

// ========== JSON Output ==========

/// JSON output structure.
#[derive(Debug, Serialize)]
pub struct JsonHistory<'a> {
    pub generated_at: String,
    pub filter: &'a FilterSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<&'a SortSpec>,
    pub summary: ActivitySummary,
    pub records: Vec<HistoryEntry<'a>>,
}

/// Format the query result as JSON.
pub fn format_history_json(
    records: &[ActivityRecord],
    filter: &FilterSpec,
    sort: Option<&SortSpec>,
    now: DateTime<Utc>,
) -> Result<String> {
    let output = JsonHistory {
        generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        filter,
        sort,
        summary: ActivitySummary::from_records(records),
        records: records.iter().map(|r| HistoryEntry::new(r, now)).collect(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

// ========== Public Interface ==========

/// Runs the history command.
pub fn run<W: Write>(
    writer: &mut W,
    store: &RecordStore<ActivityRecord>,
    args: &HistoryArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let filter = build_filter(args, config)?;
    let sort = resolve_sort(&args.query, config.history_sort.as_ref());
    tracing::debug!(?filter, ?sort, "querying activities");

    let records = query(store, &filter, sort.as_ref(), now)?;

    if args.query.json {
        let output = format_history_json(&records, &filter, sort.as_ref(), now)?;
        writeln!(writer, "{output}")?;
    } else {
        let entries: Vec<HistoryEntry<'_>> =
            records.iter().map(|r| HistoryEntry::new(r, now)).collect();
        write!(writer, "{}", format_history(&entries, store.len()))?;
        writeln!(writer)?;
        let summary = ActivitySummary::from_records(&records);
        write!(writer, "{}", format_summary(&summary))?;
    }

    Ok(())
}

//! Floats command for querying profiling float observations.
//!
//! This module implements `fq floats`, which filters and sorts the
//! observation snapshot and prints a table followed by headline figures.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use fq_core::{
    FilterSpec, ObservationRecord, ObservationStatus, ObservationSummary, Record, RecordStore,
    SortSpec, query,
};
use serde::Serialize;

use super::util::{base_filter, check_choice, resolve_sort, truncate};
use crate::{Config, FloatsArgs};

const COLUMN_WIDTHS: [usize; 9] = [7, 16, 10, 6, 9, 12, 13, 8, 8];

/// Builds the filter for `fq floats`; `--status` is a shorthand for `status=...`.
pub fn build_filter(args: &FloatsArgs, config: &Config) -> Result<FilterSpec> {
    let mut spec = base_filter(&args.query, config.default_window)?;
    if let Some(status) = &args.status {
        check_choice("--status", status, ObservationStatus::ALL)?;
        spec = spec.with("status", status.as_str());
    }
    Ok(spec)
}

// ========== Human-Readable Output ==========

fn format_location(latitude: f64, longitude: f64) -> String {
    let ns = if latitude < 0.0 { 'S' } else { 'N' };
    let ew = if longitude < 0.0 { 'W' } else { 'E' };
    format!("{:.2}°{ns}, {:.2}°{ew}", latitude.abs(), longitude.abs())
}

fn format_date(record: &ObservationRecord) -> String {
    record.timestamp().map_or_else(
        |_| truncate(&record.date, 10),
        |ts| ts.format("%Y-%m-%d").to_string(),
    )
}

fn format_row(output: &mut String, columns: [&str; 9]) {
    let [wmo, location, date, temp, salinity, pressure, oxygen, status, platform] = columns;
    writeln!(
        output,
        "{wmo:<7}  {location:<16}  {date:<10}  {temp:>6}  {salinity:>9}  {pressure:>12}  {oxygen:>13}  {status:<8}  {platform}"
    )
    .unwrap();
}

fn rule() -> String {
    COLUMN_WIDTHS
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Format matching observations as a table.
pub fn format_floats(records: &[ObservationRecord], total: usize) -> String {
    let mut output = String::new();

    writeln!(output, "FLOATS ({} of {total} records)", records.len()).unwrap();
    writeln!(output).unwrap();

    if records.is_empty() {
        writeln!(output, "No records match.").unwrap();
        return output;
    }

    format_row(
        &mut output,
        [
            "WMO", "Location", "Date", "Temp", "Salinity", "Pressure", "Oxygen", "Status",
            "Platform",
        ],
    );
    writeln!(output, "{}", rule()).unwrap();

    for record in records {
        let oxygen = record
            .oxygen
            .map_or_else(|| "N/A".to_string(), |o| format!("{o:.1} μmol/kg"));
        format_row(
            &mut output,
            [
                &record.wmo,
                &format_location(record.latitude, record.longitude),
                &format_date(record),
                &format!("{:.1}°C", record.temperature),
                &format!("{:.1} PSU", record.salinity),
                &format!("{:.1} dbar", record.pressure),
                &oxygen,
                record.status.as_str(),
                &record.platform,
            ],
        );
    }

    output
}

/// Format the summary block printed under the table.
pub fn format_summary(summary: &ObservationSummary) -> String {
    let average = |value: Option<f64>, unit: &str| {
        value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}{unit}"))
    };

    let mut output = String::new();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "  {:<17}{}", "Total records", summary.total).unwrap();
    writeln!(output, "  {:<17}{}", "Active floats", summary.active).unwrap();
    writeln!(
        output,
        "  {:<17}{}",
        "Avg temperature",
        average(summary.avg_temperature, "°C")
    )
    .unwrap();
    writeln!(
        output,
        "  {:<17}{}",
        "Avg salinity",
        average(summary.avg_salinity, " PSU")
    )
    .unwrap();
    output
}

// ========== JSON Output ==========

/// JSON output structure.
#[derive(Debug, Serialize)]
pub struct JsonFloats<'a> {
    pub generated_at: String,
    pub filter: &'a FilterSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<&'a SortSpec>,
    pub summary: ObservationSummary,
    pub records: &'a [ObservationRecord],
}

/// Format the query result as JSON.
pub fn format_floats_json(
    records: &[ObservationRecord],
    filter: &FilterSpec,
    sort: Option<&SortSpec>,
    now: DateTime<Utc>,
) -> Result<String> {
    let output = JsonFloats {
        generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        filter,
        sort,
        summary: ObservationSummary::from_records(records),
        records,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

// ========== Public Interface ==========

/// Runs the floats command.
pub fn run<W: Write>(
    writer: &mut W,
    store: &RecordStore<ObservationRecord>,
    args: &FloatsArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let filter = build_filter(args, config)?;
    let sort = resolve_sort(&args.query, Some(&config.floats_sort));
    tracing::debug!(?filter, ?sort, "querying observations");

    let records = query(store, &filter, sort.as_ref(), now)?;

    if args.query.json {
        let output = format_floats_json(&records, &filter, sort.as_ref(), now)?;
        writeln!(writer, "{output}")?;
    } else {
        write!(writer, "{}", format_floats(&records, store.len()))?;
        writeln!(writer)?;
        let summary = ObservationSummary::from_records(&records);
        write!(writer, "{}", format_summary(&summary))?;
    }

    Ok(())
}

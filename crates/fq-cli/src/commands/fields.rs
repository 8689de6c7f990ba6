//! Fields command for listing a dataset's schema.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use fq_core::record::Field;
use fq_core::{ActivityRecord, FieldKind, ObservationRecord, Record};
use serde::Serialize;

use crate::Dataset;

/// Format a field table. Optional fields carry a `?` after their type.
pub fn format_fields<R>(fields: &[Field<R>]) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "{:<11}  {:<10}  {:<6}  {:<4}  Aliases",
        "Name", "Type", "Search", "Sort"
    )
    .unwrap();

    for field in fields {
        let kind = if field.optional {
            format!("{}?", field.kind)
        } else {
            field.kind.to_string()
        };
        let aliases = if field.aliases.is_empty() {
            "-".to_string()
        } else {
            field.aliases.join(", ")
        };

        writeln!(
            output,
            "{:<11}  {:<10}  {:<6}  {:<4}  {}",
            field.name,
            kind,
            if field.searchable { "yes" } else { "-" },
            "yes",
            aliases
        )
        .unwrap();
    }

    output
}

/// One schema field in JSON output.
#[derive(Debug, Serialize)]
pub struct JsonField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub optional: bool,
    pub searchable: bool,
    pub sortable: bool,
    pub aliases: &'static [&'static str],
}

/// Format a field table as JSON.
pub fn format_fields_json<R>(fields: &[Field<R>]) -> Result<String> {
    let fields: Vec<JsonField> = fields
        .iter()
        .map(|field| JsonField {
            name: field.name,
            kind: field.kind,
            optional: field.optional,
            searchable: field.searchable,
            sortable: true,
            aliases: field.aliases,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&fields)?)
}

/// Runs the fields command.
pub fn run<W: Write>(writer: &mut W, dataset: Dataset, json: bool) -> Result<()> {
    let output = match (dataset, json) {
        (Dataset::Floats, false) => format_fields(ObservationRecord::fields()),
        (Dataset::History, false) => format_fields(ActivityRecord::fields()),
        (Dataset::Floats, true) => format_fields_json(ObservationRecord::fields())? + "\n",
        (Dataset::History, true) => format_fields_json(ActivityRecord::fields())? + "\n",
    };
    write!(writer, "{output}")?;
    Ok(())
}

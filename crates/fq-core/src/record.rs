//! Record schemas and typed field access.
//!
//! Each record type declares a static field table. A [`Field`] pairs a public
//! name with a plain function that reads that field, so filters and sorts look
//! a field up once per query and then call the accessor directly.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::QueryError;
use crate::time::parse_timestamp;
use crate::types::RecordId;

/// The value of one field of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// Absent optional value, or a timestamp that didn't parse.
    Missing,
}

impl<'a> FieldValue<'a> {
    /// Wraps an optional number.
    pub fn number(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }

    /// Parses a raw timestamp, mapping failures to [`FieldValue::Missing`].
    pub fn timestamp(raw: &'a str) -> Self {
        parse_timestamp(raw).map_or(Self::Missing, Self::Timestamp)
    }

    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns the text if this is a text value.
    pub const fn as_text(&self) -> Option<&'a str> {
        match *self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Bool,
    Timestamp,
}

impl FieldKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a record type's field table.
pub struct Field<R> {
    /// Public name used in filter and sort specs.
    pub name: &'static str,
    /// Alternate names accepted when resolving a spec.
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    /// Whether free-text search looks at this field.
    pub searchable: bool,
    /// Whether the value may be absent.
    pub optional: bool,
    /// Reads the field from a record.
    pub value: fn(&R) -> FieldValue<'_>,
}

impl<R> Field<R> {
    /// Whether `name` refers to this field.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("searchable", &self.searchable)
            .finish_non_exhaustive()
    }
}

/// A record type the query engine can filter and sort.
pub trait Record: Clone + 'static {
    /// The field table for this schema.
    fn fields() -> &'static [Field<Self>];

    /// The record's unique identifier.
    fn id(&self) -> &RecordId;

    /// The timestamp exactly as the data source supplied it.
    fn raw_timestamp(&self) -> &str;

    /// The record's timestamp, parsed.
    fn timestamp(&self) -> Result<DateTime<Utc>, QueryError> {
        parse_timestamp(self.raw_timestamp())
    }
}

/// Looks up a field of `R` by name or alias.
pub fn resolve_field<R: Record>(name: &str) -> Option<&'static Field<R>> {
    R::fields().iter().find(|field| field.answers_to(name))
}

/// The fields of `R` that free-text search covers.
pub fn searchable_fields<R: Record>() -> impl Iterator<Item = &'static Field<R>> {
    R::fields().iter().filter(|field| field.searchable)
}

//! Type-aware, stable record ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::record::{Field, FieldValue, Record, resolve_field};

/// Sort direction.
///
/// Reads `asc`/`ascending` and `desc`/`descending` through [`FromStr`], both
/// on the command line and in config; writes the short spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Direction {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl Direction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(QueryError::InvalidDirection {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which field to order by, and which way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: Direction,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Descending)
    }

    /// Resolves the field against schema `R`.
    pub fn compile<R: Record>(&self) -> Result<CompiledSort<R>, QueryError> {
        let field = resolve_field::<R>(&self.field).ok_or_else(|| QueryError::InvalidSortField {
            field: self.field.clone(),
        })?;
        Ok(CompiledSort {
            field,
            direction: self.direction,
        })
    }
}

/// A [`SortSpec`] resolved against one schema.
#[derive(Debug)]
pub struct CompiledSort<R: 'static> {
    field: &'static Field<R>,
    direction: Direction,
}

impl<R: Record> CompiledSort<R> {
    /// Returns `records` ordered by the resolved field.
    ///
    /// Keys are extracted once per record. Missing values go last in both
    /// directions and equal keys keep their input order.
    pub fn sort(&self, records: &[R]) -> Vec<R> {
        let mut keyed: Vec<(SortKey, &R)> = records
            .iter()
            .map(|r| (SortKey::from((self.field.value)(r)), r))
            .collect();

        // `sort_by` is stable, which is what keeps ties in input order.
        keyed.sort_by(|(a, _), (b, _)| compare(a, b, self.direction));

        keyed.into_iter().map(|(_, r)| r.clone()).collect()
    }
}

/// Owned, pre-normalised sort key.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    /// Lower-cased text.
    Text(String),
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Missing,
}

impl From<FieldValue<'_>> for SortKey {
    fn from(value: FieldValue<'_>) -> Self {
        match value {
            FieldValue::Text(s) => Self::Text(s.to_lowercase()),
            FieldValue::Number(n) => Self::Number(n),
            FieldValue::Bool(b) => Self::Bool(b),
            FieldValue::Timestamp(ts) => Self::Timestamp(ts),
            FieldValue::Missing => Self::Missing,
        }
    }
}

impl SortKey {
    const fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Timestamp(_) => 2,
            Self::Text(_) => 3,
            Self::Missing => 4,
        }
    }

    /// Natural order between two present keys.
    fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            // A field yields a single kind; mixed kinds order by kind.
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn compare(a: &SortKey, b: &SortKey, direction: Direction) -> Ordering {
    match (a, b) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        (SortKey::Missing, _) => Ordering::Greater,
        (_, SortKey::Missing) => Ordering::Less,
        _ => {
            let ord = a.natural_cmp(b);
            match direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        }
    }
}

/// Returns a copy of `records` ordered by `spec`.
pub fn sort<R: Record>(records: &[R], spec: &SortSpec) -> Result<Vec<R>, QueryError> {
    Ok(spec.compile::<R>()?.sort(records))
}

//! Immutable, ordered record collections.

use std::collections::HashSet;

use crate::error::QueryError;
use crate::record::Record;

/// An ordered snapshot of records sharing one schema.
///
/// Identifiers are unique and insertion order is kept; it is the order the
/// engine falls back to for ties. A store is never edited in place: every
/// change produces a new store and the old one stays valid for anyone still
/// reading it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore<R> {
    records: Vec<R>,
}

impl<R: Record> RecordStore<R> {
    /// Builds a store, rejecting duplicate identifiers.
    pub fn new(records: Vec<R>) -> Result<Self, QueryError> {
        if let Some(duplicate) = first_duplicate(&records) {
            return Err(QueryError::DuplicateIdentifier {
                id: duplicate.to_string(),
            });
        }
        Ok(Self { records })
    }

    /// The records in insertion order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds a record by identifier.
    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id().as_str() == id)
    }

    /// Returns a new store without the record `id`.
    pub fn without(&self, id: &str) -> Result<Self, QueryError> {
        let position = self.position(id)?;
        let mut records = self.records.clone();
        records.remove(position);
        Ok(Self { records })
    }

    /// Returns a new store with the record `id` replaced by `f(record)`.
    ///
    /// The replacement keeps the original's position. It must keep the
    /// identifier too; a changed identifier is rejected if it collides.
    pub fn update(&self, id: &str, f: impl FnOnce(&R) -> R) -> Result<Self, QueryError> {
        let position = self.position(id)?;
        let mut records = self.records.clone();
        records[position] = f(&self.records[position]);
        Self::new(records)
    }

    /// Records whose timestamp doesn't parse, with the parse error.
    pub fn timestamp_errors(&self) -> Vec<(&R, QueryError)> {
        self.records
            .iter()
            .filter_map(|r| r.timestamp().err().map(|err| (r, err)))
            .collect()
    }

    fn position(&self, id: &str) -> Result<usize, QueryError> {
        self.records
            .iter()
            .position(|r| r.id().as_str() == id)
            .ok_or_else(|| QueryError::RecordNotFound { id: id.to_string() })
    }
}

fn first_duplicate<R: Record>(records: &[R]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .map(|r| r.id().as_str())
        .find(|id| !seen.insert(*id))
}

impl<'a, R> IntoIterator for &'a RecordStore<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

//! Errors surfaced by the query engine.

use thiserror::Error;

/// Local validation failures for a single query or store operation.
///
/// None of these are transient. The store an operation was applied to is
/// left untouched whichever variant comes back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The sort field is not part of the record schema.
    #[error("unknown sort field: {field}")]
    InvalidSortField { field: String },

    /// A filter constraint names a field the record schema doesn't have.
    #[error("unknown filter field: {field}")]
    InvalidFilterField { field: String },

    /// A timestamp could not be parsed.
    #[error("invalid timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    /// A time-window tag was not recognised.
    #[error("invalid time window: {value} (expected all, today, last-7-days or last-30-days)")]
    InvalidWindow { value: String },

    /// A sort direction was not recognised.
    #[error("invalid sort direction: {value} (expected asc or desc)")]
    InvalidDirection { value: String },

    /// Two records in one store share an identifier.
    #[error("duplicate record identifier: {id}")]
    DuplicateIdentifier { id: String },

    /// A store delta referenced an identifier that isn't present.
    #[error("record not found: {id}")]
    RecordNotFound { id: String },
}

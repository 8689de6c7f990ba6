//! Record query engine for float observations and activity history.
//!
//! This crate contains the pure, clock-free logic behind every list screen:
//! - Records: typed schemas with a per-field accessor table
//! - Store: immutable snapshots where every change yields a new store
//! - Filtering: free-text search, field equality and time windows
//! - Sorting: type-aware and stable, missing values last
//! - Time: UTC day buckets and "N hours ago" labels against an explicit `now`

mod activity;
mod error;
pub mod filter;
mod observation;
mod query;
pub mod record;
pub mod sample;
pub mod sort;
mod store;
pub mod summary;
pub mod time;
mod types;

pub use activity::ActivityRecord;
pub use error::QueryError;
pub use filter::{FieldFilter, FilterSpec, FilterValue};
pub use observation::ObservationRecord;
pub use query::query;
pub use record::{FieldKind, Record};
pub use sort::{Direction, SortSpec};
pub use store::RecordStore;
pub use summary::{ActivitySummary, ObservationSummary};
pub use time::{Bucket, TimeWindow, bucket, parse_timestamp, relative_label};
pub use types::{ActivityKind, ActivityStatus, ObservationStatus, RecordId, ValidationError};

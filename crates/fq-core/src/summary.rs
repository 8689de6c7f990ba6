//! Aggregate figures shown alongside a query result.

use serde::Serialize;

use crate::activity::ActivityRecord;
use crate::observation::ObservationRecord;
use crate::types::{ActivityKind, ObservationStatus};

/// Headline figures for a set of observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationSummary {
    pub total: usize,
    pub active: usize,
    /// `None` when there are no records to average.
    pub avg_temperature: Option<f64>,
    pub avg_salinity: Option<f64>,
}

impl ObservationSummary {
    pub fn from_records(records: &[ObservationRecord]) -> Self {
        Self {
            total: records.len(),
            active: records
                .iter()
                .filter(|r| r.status == ObservationStatus::Active)
                .count(),
            avg_temperature: mean(records.iter().map(|r| r.temperature)),
            avg_salinity: mean(records.iter().map(|r| r.salinity)),
        }
    }
}

/// Headline figures for a set of activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivitySummary {
    pub total: usize,
    pub queries: usize,
    pub visualizations: usize,
    pub favorites: usize,
}

impl ActivitySummary {
    pub fn from_records(records: &[ActivityRecord]) -> Self {
        let count_kind = |kind: ActivityKind| records.iter().filter(|r| r.kind == kind).count();
        Self {
            total: records.len(),
            queries: count_kind(ActivityKind::Query),
            visualizations: count_kind(ActivityKind::Visualization),
            favorites: records.iter().filter(|r| r.is_favorite).count(),
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "record counts are far below 2^52"
)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

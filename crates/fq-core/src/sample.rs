//! Built-in sample snapshots.
//!
//! Five Arabian Sea floats and a short activity log, used when no data file
//! is supplied.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

use crate::activity::ActivityRecord;
use crate::observation::ObservationRecord;
use crate::types::{ActivityKind, ActivityStatus, ObservationStatus, RecordId};

/// Five float observations from January 2024.
pub fn observations() -> Vec<ObservationRecord> {
    vec![
        observation(
            "1",
            "2903458",
            (25.45, 65.23),
            "2024-01-15",
            (28.5, 35.2, 1013.2, Some(210.5)),
            ObservationStatus::Active,
            "APEX",
        ),
        observation(
            "2",
            "5906102",
            (24.82, 67.15),
            "2024-01-14",
            (27.8, 35.4, 1015.8, Some(208.2)),
            ObservationStatus::Active,
            "SOLO",
        ),
        observation(
            "3",
            "4903261",
            (26.18, 64.52),
            "2024-01-13",
            (29.1, 35.0, 1012.5, Some(212.8)),
            ObservationStatus::Active,
            "APEX",
        ),
        observation(
            "4",
            "7890123",
            (23.55, 68.31),
            "2024-01-10",
            (26.9, 35.6, 1018.1, None),
            ObservationStatus::Delayed,
            "PROVOR",
        ),
        observation(
            "5",
            "3456789",
            (27.22, 63.87),
            "2024-01-08",
            (28.9, 34.8, 1014.2, Some(215.3)),
            ObservationStatus::Inactive,
            "APEX",
        ),
    ]
}

/// Five activities logged between 2 hours and 3 days before `now`.
pub fn activities(now: DateTime<Utc>) -> Vec<ActivityRecord> {
    let ago = |delta: TimeDelta| (now - delta).to_rfc3339_opts(SecondsFormat::Secs, true);

    vec![
        ActivityRecord {
            id: RecordId::from_static("1"),
            kind: ActivityKind::Query,
            title: "Salinity profiles near equator".to_string(),
            description: "Show me salinity profiles near the equator in March 2023".to_string(),
            timestamp: ago(TimeDelta::hours(2)),
            is_favorite: true,
            status: ActivityStatus::Completed,
            result_count: Some(24),
        },
        ActivityRecord {
            id: RecordId::from_static("2"),
            kind: ActivityKind::Export,
            title: "BGC data export - Arabian Sea".to_string(),
            description: "Exported biogeochemical parameters for Arabian Sea region".to_string(),
            timestamp: ago(TimeDelta::hours(4)),
            is_favorite: false,
            status: ActivityStatus::Completed,
            result_count: Some(156),
        },
        ActivityRecord {
            id: RecordId::from_static("3"),
            kind: ActivityKind::Visualization,
            title: "Float trajectory visualization".to_string(),
            description: "Interactive map showing ARGO float movements".to_string(),
            timestamp: ago(TimeDelta::days(1)),
            is_favorite: true,
            status: ActivityStatus::Completed,
            result_count: None,
        },
        ActivityRecord {
            id: RecordId::from_static("4"),
            kind: ActivityKind::Download,
            title: "Temperature profiles download".to_string(),
            description: "Downloaded temperature profile data in NetCDF format".to_string(),
            timestamp: ago(TimeDelta::days(2)),
            is_favorite: false,
            status: ActivityStatus::Completed,
            result_count: Some(89),
        },
        ActivityRecord {
            id: RecordId::from_static("5"),
            kind: ActivityKind::Query,
            title: "Mediterranean Sea oxygen levels".to_string(),
            description: "What are the current oxygen levels in the Mediterranean?".to_string(),
            timestamp: ago(TimeDelta::days(3)),
            is_favorite: false,
            status: ActivityStatus::Failed,
            result_count: None,
        },
    ]
}

fn observation(
    id: &'static str,
    wmo: &str,
    (latitude, longitude): (f64, f64),
    date: &str,
    (temperature, salinity, pressure, oxygen): (f64, f64, f64, Option<f64>),
    status: ObservationStatus,
    platform: &str,
) -> ObservationRecord {
    ObservationRecord {
        id: RecordId::from_static(id),
        wmo: wmo.to_string(),
        latitude,
        longitude,
        date: date.to_string(),
        temperature,
        salinity,
        pressure,
        oxygen,
        status,
        platform: platform.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::store::RecordStore;
    use chrono::TimeZone;

    #[test]
    fn samples_form_valid_stores() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let observations = RecordStore::new(observations()).unwrap();
        let activities = RecordStore::new(activities(now)).unwrap();

        assert!(observations.timestamp_errors().is_empty());
        assert!(activities.timestamp_errors().is_empty());
    }

    #[test]
    fn activity_timestamps_are_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let records = activities(now);
        assert_eq!(records[0].timestamp, "2025-03-14T10:00:00Z");
        assert_eq!(
            records[4].timestamp().unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 11, 12, 0, 0).unwrap()
        );
    }
}

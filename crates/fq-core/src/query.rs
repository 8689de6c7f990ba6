//! The query pipeline: filter, then sort.

use chrono::{DateTime, Utc};

use crate::error::QueryError;
use crate::filter::FilterSpec;
use crate::record::Record;
use crate::sort::SortSpec;
use crate::store::RecordStore;

/// Filters `store` by `filter` and orders the result by `sort`.
///
/// Both specs are resolved against the schema before any record is looked
/// at, so an unknown field fails fast. Without a sort spec the result keeps
/// insertion order. `now` anchors the time window and is read nowhere else.
pub fn query<R: Record>(
    store: &RecordStore<R>,
    filter: &FilterSpec,
    sort: Option<&SortSpec>,
    now: DateTime<Utc>,
) -> Result<Vec<R>, QueryError> {
    let sort = sort.map(SortSpec::compile::<R>).transpose()?;
    let filter = filter.compile::<R>()?;

    let matched: Vec<R> = store
        .records()
        .iter()
        .filter(|r| filter.matches(r, now))
        .cloned()
        .collect();

    tracing::debug!(
        total = store.len(),
        matched = matched.len(),
        "filtered record store"
    );

    Ok(match sort {
        Some(sort) => sort.sort(&matched),
        None => matched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;
    use crate::time::{Bucket, TimeWindow, bucket, relative_label};
    use crate::{ActivityRecord, ObservationRecord};
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
    }

    fn wmos(records: &[ObservationRecord]) -> Vec<&str> {
        records.iter().map(|r| r.wmo.as_str()).collect()
    }

    #[test]
    fn active_floats_by_temperature_descending() {
        let store = RecordStore::new(sample::observations()).unwrap();
        let filter = FilterSpec::new().with("status", "active");
        let sort = SortSpec::descending("temperature");

        let result = query(&store, &filter, Some(&sort), now()).unwrap();

        // 29.1, 28.5, 27.8
        assert_eq!(wmos(&result), ["4903261", "2903458", "5906102"]);
    }

    #[test]
    fn no_sort_keeps_insertion_order() {
        let store = RecordStore::new(sample::observations()).unwrap();
        let filter = FilterSpec::new().search("apex");
        let result = query(&store, &filter, None, now()).unwrap();
        assert_eq!(wmos(&result), ["2903458", "4903261", "3456789"]);
    }

    #[test]
    fn unknown_sort_field_fails_even_when_nothing_matches() {
        let store = RecordStore::new(sample::observations()).unwrap();
        let filter = FilterSpec::new().search("no such float");
        let sort = SortSpec::ascending("depth");

        let err = query(&store, &filter, Some(&sort), now()).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSortField { .. }));
    }

    #[test]
    fn store_is_unchanged_by_a_query() {
        let store = RecordStore::new(sample::observations()).unwrap();
        let before = store.clone();
        let sort = SortSpec::ascending("salinity");
        let _ = query(&store, &FilterSpec::new(), Some(&sort), now()).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn recent_queries_oldest_first() {
        let store: RecordStore<ActivityRecord> =
            RecordStore::new(sample::activities(now())).unwrap();
        let filter = FilterSpec::new()
            .with("type", "query")
            .within(TimeWindow::Last7Days);
        let sort = SortSpec::ascending("timestamp");

        let result = query(&store, &filter, Some(&sort), now()).unwrap();

        let titles: Vec<_> = result.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Mediterranean Sea oxygen levels",
                "Salinity profiles near equator"
            ]
        );
    }

    #[test]
    fn two_hours_ago_label_and_bucket() {
        let store = RecordStore::new(sample::activities(now())).unwrap();
        let first = store.get("1").unwrap();
        let ts = first.timestamp().unwrap();

        assert_eq!(relative_label(now(), ts), "2 hours ago");
        assert_eq!(bucket(now(), ts), Bucket::Today);

        let just_after_midnight = Utc.with_ymd_and_hms(2025, 3, 14, 1, 0, 0).unwrap();
        let late_yesterday = just_after_midnight - TimeDelta::hours(2);
        assert_eq!(
            relative_label(just_after_midnight, late_yesterday),
            "2 hours ago"
        );
        assert_eq!(bucket(just_after_midnight, late_yesterday), Bucket::Last7Days);
    }
}

//! Record filtering: free-text search, field equality, time windows.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::record::{Field, FieldKind, FieldValue, Record, resolve_field, searchable_fields};
use crate::time::{TimeWindow, parse_timestamp};

/// Value of a field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterValue {
    /// No constraint. Spelled `all`.
    #[default]
    All,
    /// The field must equal this value.
    Equals(String),
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Equals(value)
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<FilterValue> for String {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::All => "all".to_string(),
            FilterValue::Equals(s) => s,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Equals(s) => write!(f, "{s}"),
        }
    }
}

/// An equality constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: FilterValue,
}

/// Everything a query filters on. All active constraints must hold.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Free text, matched case-insensitively against the searchable fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldFilter>,
    #[serde(default)]
    pub window: TimeWindow,
}

impl FilterSpec {
    /// A spec that matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Adds an equality constraint. A value of `all` adds no constraint.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.fields.push(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub const fn within(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    /// Resolves field names and parses constraint values for schema `R`.
    pub fn compile<R: Record>(&self) -> Result<CompiledFilter<R>, QueryError> {
        let mut constraints = Vec::new();
        for filter in &self.fields {
            let field = resolve_field::<R>(&filter.field).ok_or_else(|| {
                QueryError::InvalidFilterField {
                    field: filter.field.clone(),
                }
            })?;
            if let FilterValue::Equals(raw) = &filter.value {
                constraints.push((field, Target::parse(field, raw)));
            }
        }

        let needle = self
            .query
            .as_deref()
            .map(str::to_lowercase)
            .filter(|q| !q.is_empty());

        Ok(CompiledFilter {
            constraints,
            needle,
            window: self.window,
        })
    }
}

/// A constraint value parsed to the field's declared kind.
#[derive(Debug, Clone, PartialEq)]
enum Target {
    Text(String),
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// The value doesn't parse as the field's kind; nothing can equal it.
    Unmatchable,
}

impl Target {
    fn parse<R>(field: &Field<R>, raw: &str) -> Self {
        let parsed = match field.kind {
            FieldKind::Text => Some(Self::Text(raw.to_string())),
            FieldKind::Number => raw.trim().parse().ok().map(Self::Number),
            FieldKind::Bool => raw.trim().parse().ok().map(Self::Bool),
            FieldKind::Timestamp => parse_timestamp(raw).ok().map(Self::Timestamp),
        };
        parsed.unwrap_or_else(|| {
            tracing::debug!(
                field = field.name,
                kind = %field.kind,
                value = raw,
                "filter value does not parse as field kind"
            );
            Self::Unmatchable
        })
    }

    #[expect(clippy::float_cmp, reason = "filters are exact equality")]
    fn matches(&self, value: FieldValue<'_>) -> bool {
        match (self, value) {
            (Self::Text(want), FieldValue::Text(got)) => want == got,
            (Self::Number(want), FieldValue::Number(got)) => *want == got,
            (Self::Bool(want), FieldValue::Bool(got)) => *want == got,
            (Self::Timestamp(want), FieldValue::Timestamp(got)) => *want == got,
            _ => false,
        }
    }
}

/// A [`FilterSpec`] resolved against one schema, ready to test records.
#[derive(Debug)]
pub struct CompiledFilter<R: 'static> {
    constraints: Vec<(&'static Field<R>, Target)>,
    needle: Option<String>,
    window: TimeWindow,
}

impl<R: Record> CompiledFilter<R> {
    /// Whether `record` satisfies every constraint, as seen from `now`.
    ///
    /// Field equality runs first, then text search, then the time window.
    pub fn matches(&self, record: &R, now: DateTime<Utc>) -> bool {
        self.constraints
            .iter()
            .all(|(field, target)| target.matches((field.value)(record)))
            && self.matches_text(record)
            && self.matches_window(record, now)
    }

    fn matches_text(&self, record: &R) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        searchable_fields::<R>().any(|field| {
            (field.value)(record)
                .as_text()
                .is_some_and(|text| text.to_lowercase().contains(needle.as_str()))
        })
    }

    fn matches_window(&self, record: &R, now: DateTime<Utc>) -> bool {
        if self.window == TimeWindow::All {
            return true;
        }
        match record.timestamp() {
            Ok(ts) => self.window.contains(now, ts),
            Err(err) => {
                tracing::debug!(id = %record.id(), %err, "excluded from time window");
                false
            }
        }
    }
}

/// Returns the records matching `spec`, in their original order.
pub fn apply<R: Record>(
    records: &[R],
    spec: &FilterSpec,
    now: DateTime<Utc>,
) -> Result<Vec<R>, QueryError> {
    let filter = spec.compile::<R>()?;
    Ok(records
        .iter()
        .filter(|r| filter.matches(r, now))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;
    use crate::{ActivityRecord, ObservationRecord};
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
    }

    fn ids<R: Record>(records: &[R]) -> Vec<&str> {
        records.iter().map(|r| r.id().as_str()).collect()
    }

    #[test]
    fn empty_spec_matches_everything_in_order() {
        let records = sample::observations();
        let result = apply(&records, &FilterSpec::new(), now()).unwrap();
        assert_eq!(ids(&result), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn status_filter_matches_exactly() {
        let records = sample::observations();
        let spec = FilterSpec::new().with("status", "active");
        let result = apply(&records, &spec, now()).unwrap();
        assert_eq!(ids(&result), ["1", "2", "3"]);
    }

    #[test]
    fn all_is_not_a_literal_value() {
        let records = sample::observations();
        let spec = FilterSpec::new().with("status", "all");
        assert_eq!(apply(&records, &spec, now()).unwrap().len(), 5);
    }

    #[test]
    fn status_filter_is_case_sensitive() {
        let records = sample::observations();
        let spec = FilterSpec::new().with("status", "Active");
        assert!(apply(&records, &spec, now()).unwrap().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_across_designated_fields() {
        let records = sample::observations();

        let by_platform = FilterSpec::new().search("apex");
        assert_eq!(ids(&apply(&records, &by_platform, now()).unwrap()), ["1", "3", "5"]);

        let by_wmo = FilterSpec::new().search("5906");
        assert_eq!(ids(&apply(&records, &by_wmo, now()).unwrap()), ["2"]);
    }

    #[test]
    fn search_ignores_undesignated_fields() {
        let records = sample::observations();
        // "active" is a status, and status isn't searchable
        let spec = FilterSpec::new().search("active");
        assert!(apply(&records, &spec, now()).unwrap().is_empty());
    }

    #[test]
    fn empty_query_matches_all() {
        let records = sample::observations();
        let spec = FilterSpec::new().search("");
        assert_eq!(apply(&records, &spec, now()).unwrap().len(), 5);
    }

    #[test]
    fn activity_search_covers_title_and_description() {
        let records = sample::activities(now());

        let spec = FilterSpec::new().search("MEDITERRANEAN");
        assert_eq!(ids(&apply(&records, &spec, now()).unwrap()), ["5"]);

        let spec = FilterSpec::new().search("netcdf format");
        assert_eq!(ids(&apply(&records, &spec, now()).unwrap()), ["4"]);
    }

    #[test]
    fn constraints_combine_with_and() {
        let records = sample::observations();
        let spec = FilterSpec::new().search("apex").with("status", "active");
        assert_eq!(ids(&apply(&records, &spec, now()).unwrap()), ["1", "3"]);
    }

    #[test]
    fn additional_constraints_never_grow_the_result() {
        let records = sample::activities(now());
        let base = FilterSpec::new().within(TimeWindow::Last7Days);
        let narrowed = [
            base.clone().with("type", "query"),
            base.clone().with("isFavorite", "true"),
            base.clone().with("status", "failed"),
            base.clone().search("data"),
        ];

        let base_len = apply(&records, &base, now()).unwrap().len();
        for spec in &narrowed {
            let len = apply(&records, spec, now()).unwrap().len();
            assert!(len <= base_len, "{spec:?} grew the result");
            let tighter = spec.clone().with("status", "completed");
            assert!(apply(&records, &tighter, now()).unwrap().len() <= len);
        }
    }

    #[test]
    fn bool_and_number_fields_filter_by_parsed_value() {
        let records = sample::activities(now());

        let favorites = FilterSpec::new().with("isFavorite", "true");
        assert_eq!(ids(&apply(&records, &favorites, now()).unwrap()), ["1", "3"]);

        let counted = FilterSpec::new().with("resultCount", "156");
        assert_eq!(ids(&apply(&records, &counted, now()).unwrap()), ["2"]);

        let nonsense = FilterSpec::new().with("resultCount", "lots");
        assert!(apply(&records, &nonsense, now()).unwrap().is_empty());
    }

    #[test]
    fn missing_optional_never_matches_a_constraint() {
        // Every float that carries the sensor reads the same value; "4" has none.
        let records: Vec<ObservationRecord> = sample::observations()
            .into_iter()
            .map(|mut r| {
                r.oxygen = r.oxygen.map(|_| 210.5);
                r
            })
            .collect();
        assert!(records.iter().any(|r| r.oxygen.is_none()));

        let spec = FilterSpec::new().with("oxygen", "210.5");
        assert_eq!(ids(&apply(&records, &spec, now()).unwrap()), ["1", "2", "3", "5"]);

        let spec = FilterSpec::new().with("oxygen", "all");
        assert_eq!(
            ids(&apply(&records, &spec, now()).unwrap()),
            ["1", "2", "3", "4", "5"]
        );
    }

    #[test]
    fn timestamp_filter_compares_instants() {
        let records = sample::observations();
        let spec = FilterSpec::new().with("date", "2024-01-13T00:00:00Z");
        assert_eq!(ids(&apply(&records, &spec, now()).unwrap()), ["3"]);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let records = sample::observations();
        let spec = FilterSpec::new().with("depth", "all");
        let err = apply(&records, &spec, now()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidFilterField {
                field: "depth".to_string()
            }
        );
    }

    #[test]
    fn time_windows_over_sample_history() {
        let records = sample::activities(now());

        let today = FilterSpec::new().within(TimeWindow::Today);
        assert_eq!(ids(&apply(&records, &today, now()).unwrap()), ["1", "2"]);

        let week = FilterSpec::new().within(TimeWindow::Last7Days);
        assert_eq!(apply(&records, &week, now()).unwrap().len(), 5);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let now = now();
        let mut records = sample::activities(now);
        records[0].timestamp = (now - TimeDelta::days(7)).to_rfc3339();
        records[1].timestamp =
            (now - TimeDelta::days(7) - TimeDelta::milliseconds(1)).to_rfc3339();

        let spec = FilterSpec::new().within(TimeWindow::Last7Days);
        let result = apply(&records[..2], &spec, now).unwrap();
        assert_eq!(ids(&result), ["1"]);
    }

    #[test]
    fn malformed_timestamp_excluded_from_windows_only() {
        let now = now();
        let mut records: Vec<ActivityRecord> = sample::activities(now);
        records[0].timestamp = "two hours ago".to_string();

        let windowed = FilterSpec::new().within(TimeWindow::Last30Days);
        assert_eq!(
            ids(&apply(&records, &windowed, now).unwrap()),
            ["2", "3", "4", "5"]
        );

        let unwindowed = FilterSpec::new();
        assert_eq!(apply(&records, &unwindowed, now).unwrap().len(), 5);
    }

    #[test]
    fn filter_value_serde_maps_all_sentinel() {
        let value: FilterValue = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(value, FilterValue::All);
        let value: FilterValue = serde_json::from_str("\"delayed\"").unwrap();
        assert_eq!(value, FilterValue::Equals("delayed".to_string()));
    }

    #[test]
    fn spec_deserializes_with_defaults() {
        let spec: FilterSpec = serde_json::from_str(r#"{"query": "solo"}"#).unwrap();
        assert_eq!(spec.window, TimeWindow::All);
        let records: Vec<ObservationRecord> = sample::observations();
        assert_eq!(ids(&apply(&records, &spec, now()).unwrap()), ["2"]);
    }
}

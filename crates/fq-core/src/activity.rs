//! User activity history: queries run, charts drawn, data exported.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::record::{Field, FieldKind, FieldValue, Record};
use crate::store::RecordStore;
use crate::types::{ActivityKind, ActivityStatus, RecordId};

/// One entry of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    /// When the activity happened, as supplied by the source.
    #[serde(alias = "date")]
    pub timestamp: String,
    #[serde(default)]
    pub is_favorite: bool,
    pub status: ActivityStatus,
    /// Number of records the activity produced, if it produced any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<u64>,
}

#[expect(
    clippy::cast_precision_loss,
    reason = "result counts are far below 2^52"
)]
fn result_count(record: &ActivityRecord) -> FieldValue<'_> {
    FieldValue::number(record.result_count.map(|n| n as f64))
}

static FIELDS: [Field<ActivityRecord>; 8] = [
    Field {
        name: "id",
        aliases: &[],
        kind: FieldKind::Text,
        searchable: false,
        optional: false,
        value: |r| FieldValue::Text(r.id.as_str()),
    },
    Field {
        name: "type",
        aliases: &["kind"],
        kind: FieldKind::Text,
        searchable: false,
        optional: false,
        value: |r| FieldValue::Text(r.kind.as_str()),
    },
    Field {
        name: "title",
        aliases: &[],
        kind: FieldKind::Text,
        searchable: true,
        optional: false,
        value: |r| FieldValue::Text(&r.title),
    },
    Field {
        name: "description",
        aliases: &[],
        kind: FieldKind::Text,
        searchable: true,
        optional: false,
        value: |r| FieldValue::Text(&r.description),
    },
    Field {
        name: "timestamp",
        aliases: &["date"],
        kind: FieldKind::Timestamp,
        searchable: false,
        optional: false,
        value: |r| FieldValue::timestamp(&r.timestamp),
    },
    Field {
        name: "isFavorite",
        aliases: &["favorite"],
        kind: FieldKind::Bool,
        searchable: false,
        optional: false,
        value: |r| FieldValue::Bool(r.is_favorite),
    },
    Field {
        name: "status",
        aliases: &[],
        kind: FieldKind::Text,
        searchable: false,
        optional: false,
        value: |r| FieldValue::Text(r.status.as_str()),
    },
    Field {
        name: "resultCount",
        aliases: &["results"],
        kind: FieldKind::Number,
        searchable: false,
        optional: true,
        value: result_count,
    },
];

impl Record for ActivityRecord {
    fn fields() -> &'static [Field<Self>] {
        &FIELDS
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn raw_timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl RecordStore<ActivityRecord> {
    /// Returns a new store with the favorite flag of `id` flipped.
    pub fn toggle_favorite(&self, id: &str) -> Result<Self, QueryError> {
        self.update(id, |activity| ActivityRecord {
            is_favorite: !activity.is_favorite,
            ..activity.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::resolve_field;

    fn activity(id: &str, favorite: bool) -> ActivityRecord {
        ActivityRecord {
            id: RecordId::new(id).unwrap(),
            kind: ActivityKind::Export,
            title: "BGC data export - Arabian Sea".to_string(),
            description: "Exported biogeochemical parameters".to_string(),
            timestamp: "2025-03-14T08:00:00Z".to_string(),
            is_favorite: favorite,
            status: ActivityStatus::Completed,
            result_count: Some(156),
        }
    }

    #[test]
    fn serializes_with_source_field_names() {
        let json = serde_json::to_value(activity("2", false)).unwrap();
        assert_eq!(json["type"], "export");
        assert_eq!(json["isFavorite"], false);
        assert_eq!(json["resultCount"], 156);
    }

    #[test]
    fn missing_result_count_is_omitted() {
        let mut record = activity("3", true);
        record.result_count = None;
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("resultCount").is_none());

        let field = resolve_field::<ActivityRecord>("resultCount").unwrap();
        assert!((field.value)(&record).is_missing());
    }

    #[test]
    fn toggle_favorite_leaves_original_store_alone() {
        let store = RecordStore::new(vec![activity("1", true), activity("2", false)]).unwrap();

        let toggled = store.toggle_favorite("2").unwrap();

        assert!(toggled.get("2").unwrap().is_favorite);
        assert!(!store.get("2").unwrap().is_favorite);
        assert!(toggled.get("1").unwrap().is_favorite);
    }

    #[test]
    fn toggle_favorite_unknown_id_fails() {
        let store = RecordStore::new(vec![activity("1", true)]).unwrap();
        let err = store.toggle_favorite("9").unwrap_err();
        assert_eq!(
            err,
            QueryError::RecordNotFound {
                id: "9".to_string()
            }
        );
    }
}

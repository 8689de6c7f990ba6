//! Profiling float observations.

use serde::{Deserialize, Serialize};

use crate::record::{Field, FieldKind, FieldValue, Record};
use crate::types::{ObservationStatus, RecordId};

/// One reading reported by a profiling float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Unique identifier within a store.
    pub id: RecordId,
    /// WMO number of the float.
    pub wmo: String,
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
    /// Observation date as supplied by the source.
    #[serde(alias = "timestamp")]
    pub date: String,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Practical salinity units.
    pub salinity: f64,
    /// Decibars.
    pub pressure: f64,
    /// Dissolved oxygen in µmol/kg, when the float carries the sensor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen: Option<f64>,
    pub status: ObservationStatus,
    /// Float model (APEX, SOLO, PROVOR, ...).
    pub platform: String,
}

static FIELDS: [Field<ObservationRecord>; 11] = [
    Field {
        name: "id",
        aliases: &[],
        kind: FieldKind::Text,
        searchable: false,
        optional: false,
        value: |r| FieldValue::Text(r.id.as_str()),
    },
    Field {
        name: "wmo",
        aliases: &[],
        kind: FieldKind::Text,
        searchable: true,
        optional: false,
        value: |r| FieldValue::Text(&r.wmo),
    },
    Field {
        name: "latitude",
        aliases: &["lat"],
        kind: FieldKind::Number,
        searchable: false,
        optional: false,
        value: |r| FieldValue::Number(r.latitude),
    },
    Field {
        name: "longitude",
        aliases: &["lon"],
        kind: FieldKind::Number,
        searchable: false,
        optional: false,
        value: |r| FieldValue::Number(r.longitude),
    },
    Field {
        name: "date",
        aliases: &["timestamp"],
        kind: FieldKind::Timestamp,
        searchable: false,
        optional: false,
        value: |r| FieldValue::timestamp(&r.date),
    },
    Field {
        name: "temperature",
        aliases: &[],
        kind: FieldKind::Number,
        searchable: false,
        optional: false,
        value: |r| FieldValue::Number(r.temperature),
    },
    Field {
        name: "salinity",
        aliases: &[],
        kind: FieldKind::Number,
        searchable: false,
        optional: false,
        value: |r| FieldValue::Number(r.salinity),
    },
    Field {
        name: "pressure",
        aliases: &[],
        kind: FieldKind::Number,
        searchable: false,
        optional: false,
        value: |r| FieldValue::Number(r.pressure),
    },
    Field {
        name: "oxygen",
        aliases: &[],
        kind: FieldKind::Number,
        searchable: false,
        optional: true,
        value: |r| FieldValue::number(r.oxygen),
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
        name: "platform",
        aliases: &[],
        kind: FieldKind::Text,
        searchable: true,
        optional: false,
        value: |r| FieldValue::Text(&r.platform),
    },
];

impl Record for ObservationRecord {
    fn fields() -> &'static [Field<Self>] {
        &FIELDS
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn raw_timestamp(&self) -> &str {
        &self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::resolve_field;

    fn sample_json() -> &'static str {
        r#"{
            "id": "4",
            "wmo": "7890123",
            "latitude": 23.55,
            "longitude": 68.31,
            "date": "2024-01-10",
            "temperature": 26.9,
            "salinity": 35.6,
            "pressure": 1018.1,
            "status": "delayed",
            "platform": "PROVOR"
        }"#
    }

    #[test]
    fn deserializes_without_oxygen() {
        let record: ObservationRecord = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(record.oxygen, None);
        assert_eq!(record.status, ObservationStatus::Delayed);
    }

    #[test]
    fn accepts_timestamp_as_date_alias() {
        let json = sample_json().replace("\"date\"", "\"timestamp\"");
        let record: ObservationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.date, "2024-01-10");
    }

    #[test]
    fn rejects_unknown_status() {
        let json = sample_json().replace("delayed", "lost");
        let result: Result<ObservationRecord, _> = serde_json::from_str(&json);
        assert!(result.is_err());
    }

    #[test]
    fn field_table_reads_values() {
        let record: ObservationRecord = serde_json::from_str(sample_json()).unwrap();

        let oxygen = resolve_field::<ObservationRecord>("oxygen").unwrap();
        assert!((oxygen.value)(&record).is_missing());

        let status = resolve_field::<ObservationRecord>("status").unwrap();
        assert_eq!((status.value)(&record), FieldValue::Text("delayed"));

        let temperature = resolve_field::<ObservationRecord>("temperature").unwrap();
        assert_eq!((temperature.value)(&record), FieldValue::Number(26.9));
    }
}

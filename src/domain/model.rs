use crate::core::feeds::FeedType;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text written for [`FieldValue::Missing`] in every serialized output.
pub const NULL_MARKER: &str = "NaN";

/// One semi-structured record pulled out of a feed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn from_object(obj: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            data: obj.into_iter().collect(),
        }
    }
}

/// A projected cell. `Missing` means the source record did not carry the key at all,
/// which is not the same as the key being present with a JSON `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Value(serde_json::Value),
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            FieldValue::Missing => None,
            FieldValue::Value(v) => Some(v),
        }
    }

    /// Text form used by the CSV and database sinks.
    ///
    /// `Missing` becomes [`NULL_MARKER`], a JSON `null` becomes `None` (an empty CSV cell or
    /// SQL NULL), strings are written raw and every other value as compact JSON. Reading a
    /// CSV back therefore cannot tell `null` from `""`, nor a number from its string form.
    pub fn to_cell(&self) -> Option<String> {
        match self {
            FieldValue::Missing => Some(NULL_MARKER.to_string()),
            FieldValue::Value(serde_json::Value::Null) => None,
            FieldValue::Value(serde_json::Value::String(s)) => Some(s.clone()),
            FieldValue::Value(other) => Some(other.to_string()),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        FieldValue::Value(value)
    }
}

/// Ordered set of named cells; names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    fields: Vec<(String, FieldValue)>,
}

impl NormalizedRow {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Sets `name`, keeping its position if it already exists and appending otherwise.
    pub fn insert(&mut self, name: &str, value: FieldValue) {
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Fetched document plus the records extracted from it for one feed type.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub feed_type: FeedType,
    pub document: serde_json::Value,
    pub records: Vec<Record>,
    pub scraped_at: DateTime<Local>,
}

/// Output of one scrape invocation. Every row carries exactly `columns`, in that order.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub feed_type: FeedType,
    pub company_name: String,
    pub scraped_at: DateTime<Local>,
    pub columns: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as text cells aligned with `columns`.
    pub fn cell_rows(&self) -> impl Iterator<Item = Vec<Option<String>>> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .map(|column| row.get(column).and_then(FieldValue::to_cell))
                .collect()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows: usize,
    pub csv_path: Option<String>,
    pub database_rows: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_keeps_position_on_overwrite() {
        let mut row = NormalizedRow::default();
        row.insert("alert_id", json!("a1").into());
        row.insert("last_updated", json!(1).into());
        row.insert("summary", FieldValue::Missing);
        row.insert("last_updated", json!("2017-07-14T02:40:00").into());

        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["alert_id", "last_updated", "summary"]);
        assert_eq!(
            row.get("last_updated"),
            Some(&FieldValue::Value(json!("2017-07-14T02:40:00")))
        );
    }

    #[test]
    fn test_to_cell_distinguishes_missing_null_and_empty() {
        assert_eq!(FieldValue::Missing.to_cell().as_deref(), Some("NaN"));
        assert_eq!(FieldValue::Value(json!(null)).to_cell(), None);
        assert_eq!(FieldValue::Value(json!("")).to_cell().as_deref(), Some(""));
        assert_eq!(FieldValue::Value(json!(41.88)).to_cell().as_deref(), Some("41.88"));
        assert_eq!(
            FieldValue::Value(json!(["key", "creditcard"])).to_cell().as_deref(),
            Some(r#"["key","creditcard"]"#)
        );
    }
}

use crate::core::feeds::{ExtractPath, PathSegment};
use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// Top-level keys of system_information that are feed metadata, not system fields.
const ROOT_METADATA_KEYS: [&str; 2] = ["ttl", "last_updated"];

/// Pulls the records for one feed type out of a fetched document.
///
/// A missing segment or an unexpected container type is a [`EtlError::ShapeError`]; nothing
/// is defaulted here.
pub fn extract(document: &Value, path: &ExtractPath) -> Result<Vec<Record>> {
    match path {
        ExtractPath::Nested(segments) => extract_nested(document, segments, path),
        ExtractPath::Root => extract_root(document).map(|record| vec![record]),
    }
}

fn extract_nested(
    document: &Value,
    segments: &[PathSegment],
    path: &ExtractPath,
) -> Result<Vec<Record>> {
    let mut current = document;

    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(obj)) => {
                obj.get(*key)
                    .ok_or_else(|| shape_error(path, format!("missing key '{}'", key)))?
            }
            (PathSegment::Index(index), Value::Array(items)) => {
                items.get(*index).ok_or_else(|| {
                    shape_error(
                        path,
                        format!("index {} out of range (len {})", index, items.len()),
                    )
                })?
            }
            (segment, other) => {
                return Err(shape_error(
                    path,
                    format!("cannot descend into {} with '{}'", kind(other), segment),
                ))
            }
        };
    }

    let items = match current {
        Value::Array(items) => items,
        other => {
            return Err(shape_error(
                path,
                format!("expected an array of records, found {}", kind(other)),
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(obj) => Ok(Record::from_object(obj.clone())),
            other => Err(shape_error(
                path,
                format!("record {} is {}, expected an object", index, kind(other)),
            )),
        })
        .collect()
}

// Rotation: after the metadata keys are dropped, each remaining top-level entry is one row.
// Exactly one row is accepted; anything else is reported instead of guessed.
fn extract_root(document: &Value) -> Result<Record> {
    let path = ExtractPath::Root;
    let obj = match document {
        Value::Object(obj) => obj,
        other => {
            return Err(shape_error(
                &path,
                format!("expected an object, found {}", kind(other)),
            ))
        }
    };

    let mut remaining = obj
        .iter()
        .filter(|(key, _)| !ROOT_METADATA_KEYS.contains(&key.as_str()));

    let (name, row) = match (remaining.next(), remaining.next()) {
        (Some(entry), None) => entry,
        (None, _) => {
            return Err(shape_error(
                &path,
                "no record left after dropping ttl and last_updated".to_string(),
            ))
        }
        (Some(_), Some(_)) => {
            let keys: Vec<&str> = obj
                .keys()
                .map(String::as_str)
                .filter(|key| !ROOT_METADATA_KEYS.contains(key))
                .collect();
            return Err(shape_error(
                &path,
                format!("expected exactly one record, found {}: {}", keys.len(), keys.join(", ")),
            ));
        }
    };

    match row {
        Value::Object(fields) => Ok(Record::from_object(fields.clone())),
        other => Err(shape_error(
            &path,
            format!("entry '{}' is {}, expected an object", name, kind(other)),
        )),
    }
}

fn shape_error(path: &ExtractPath, message: String) -> EtlError {
    EtlError::ShapeError {
        path: path.to_string(),
        message,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feeds::FeedType;
    use serde_json::json;

    #[test]
    fn test_extract_nested_records_in_order() {
        let doc = json!({
            "last_updated": 1500000000,
            "ttl": 10,
            "data": {"bikes": [
                {"bike_id": "b1", "lat": 41.88},
                {"bike_id": "b2", "lat": 41.89},
                {"bike_id": "b3", "lat": 41.90}
            ]}
        });

        let records = extract(&doc, &FeedType::FreeBikeStatus.adapter().path).unwrap();
        let ids: Vec<&str> = records
            .iter()
            .map(|r| r.data.get("bike_id").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["b1", "b2", "b3"]);
    }

    #[test]
    fn test_extract_empty_list() {
        let doc = json!({"data": {"regions": []}});
        let records = extract(&doc, &FeedType::SystemRegions.adapter().path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_segment_is_shape_error() {
        let doc = json!({"data": {"stations": []}});
        let err = extract(&doc, &FeedType::FreeBikeStatus.adapter().path).unwrap_err();
        match err {
            EtlError::ShapeError { path, message } => {
                assert_eq!(path, "data.bikes");
                assert!(message.contains("'bikes'"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_container_is_shape_error() {
        let doc = json!({"data": ["not", "an", "object"]});
        assert!(matches!(
            extract(&doc, &FeedType::SystemAlerts.adapter().path),
            Err(EtlError::ShapeError { .. })
        ));

        let doc = json!({"data": {"alerts": {"alert_id": "a1"}}});
        assert!(matches!(
            extract(&doc, &FeedType::SystemAlerts.adapter().path),
            Err(EtlError::ShapeError { .. })
        ));
    }

    #[test]
    fn test_non_object_record_is_shape_error() {
        let doc = json!({"data": {"regions": [{"region_id": "1"}, "loop"]}});
        let err = extract(&doc, &FeedType::SystemRegions.adapter().path).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_index_segment() {
        const PATH: &[PathSegment] = &[PathSegment::Key("feeds"), PathSegment::Index(1)];
        let doc = json!({"feeds": [[{"a": 1}], [{"a": 2}, {"a": 3}]]});
        let records = extract(&doc, &ExtractPath::Nested(PATH)).unwrap();
        assert_eq!(records.len(), 2);

        const OUT_OF_RANGE: &[PathSegment] = &[PathSegment::Key("feeds"), PathSegment::Index(5)];
        assert!(extract(&doc, &ExtractPath::Nested(OUT_OF_RANGE)).is_err());
    }

    #[test]
    fn test_root_drops_metadata_and_yields_one_record() {
        let doc = json!({
            "last_updated": 1500000000,
            "ttl": 60,
            "data": {"system_id": "acme_chicago", "language": "en", "name": "Acme Bikes"}
        });

        let records = extract(&doc, &ExtractPath::Root).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data.get("system_id").unwrap(), "acme_chicago");
        assert!(!records[0].data.contains_key("ttl"));
        assert!(!records[0].data.contains_key("last_updated"));
    }

    #[test]
    fn test_root_without_metadata_keys() {
        let doc = json!({"data": {"system_id": "acme"}});
        let records = extract(&doc, &ExtractPath::Root).unwrap();
        assert_eq!(records[0].data.get("system_id").unwrap(), "acme");
    }

    #[test]
    fn test_root_with_zero_or_many_records_is_shape_error() {
        let empty = json!({"last_updated": 1, "ttl": 0});
        assert!(matches!(
            extract(&empty, &ExtractPath::Root),
            Err(EtlError::ShapeError { .. })
        ));

        let many = json!({"ttl": 0, "data": {"system_id": "a"}, "extra": {"system_id": "b"}});
        let err = extract(&many, &ExtractPath::Root).unwrap_err();
        assert!(err.to_string().contains("exactly one record"));
    }

    #[test]
    fn test_root_flat_scalar_entry_is_shape_error() {
        let doc = json!({"ttl": 0, "system_id": "acme"});
        assert!(matches!(
            extract(&doc, &ExtractPath::Root),
            Err(EtlError::ShapeError { .. })
        ));
        assert!(extract(&json!([1, 2]), &ExtractPath::Root).is_err());
    }
}

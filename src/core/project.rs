use crate::domain::model::{FieldValue, NormalizedRow, Record};

/// Projects records onto a fixed column list.
///
/// Every output row has exactly `columns`, in order. Present keys are copied verbatim
/// (nested values included); absent keys become [`FieldValue::Missing`]. Keys outside
/// `columns` are dropped. Row order follows `records`.
pub fn project(columns: &[&str], records: &[Record]) -> Vec<NormalizedRow> {
    records
        .iter()
        .map(|record| project_record(columns, record))
        .collect()
}

fn project_record(columns: &[&str], record: &Record) -> NormalizedRow {
    let mut row = NormalizedRow::with_capacity(columns.len() + 3);
    for column in columns {
        let value = match record.data.get(*column) {
            Some(value) => FieldValue::Value(value.clone()),
            None => FieldValue::Missing,
        };
        row.insert(column, value);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(obj) => Record::from_object(obj),
            _ => panic!("test records must be objects"),
        }
    }

    #[test]
    fn test_output_keys_equal_columns_in_order() {
        let columns = ["station_id", "name", "capacity"];
        let rows = project(
            &columns,
            &[record(json!({"capacity": 15, "extra": true, "station_id": "s1"}))],
        );

        let keys: Vec<&str> = rows[0].keys().collect();
        assert_eq!(keys, columns.to_vec());
    }

    #[test]
    fn test_missing_key_becomes_null_marker() {
        let rows = project(&["region_id", "name"], &[record(json!({"region_id": "1"}))]);
        assert_eq!(rows[0].get("name"), Some(&FieldValue::Missing));
        assert_eq!(rows[0].get("region_id"), Some(&FieldValue::Value(json!("1"))));
    }

    #[test]
    fn test_present_null_and_empty_are_not_missing() {
        let rows = project(
            &["address", "cross_street"],
            &[record(json!({"address": null, "cross_street": ""}))],
        );
        assert_eq!(rows[0].get("address"), Some(&FieldValue::Value(json!(null))));
        assert_eq!(rows[0].get("cross_street"), Some(&FieldValue::Value(json!(""))));
    }

    #[test]
    fn test_nested_values_pass_through_unchanged() {
        let available_types = json!([{"vehicle_type_id": "ebike", "count": 3}]);
        let rows = project(
            &["num_bikes_available_types", "rental_methods"],
            &[record(json!({
                "num_bikes_available_types": available_types.clone(),
                "rental_methods": ["KEY", "CREDITCARD"]
            }))],
        );
        assert_eq!(
            rows[0].get("num_bikes_available_types"),
            Some(&FieldValue::Value(available_types))
        );
        assert_eq!(
            rows[0].get("rental_methods"),
            Some(&FieldValue::Value(json!(["KEY", "CREDITCARD"])))
        );
    }

    #[test]
    fn test_no_type_coercion() {
        let rows = project(
            &["lat", "is_reserved", "bike_id"],
            &[record(json!({"lat": "41.88", "is_reserved": 0, "bike_id": 17}))],
        );
        assert_eq!(rows[0].get("lat"), Some(&FieldValue::Value(json!("41.88"))));
        assert_eq!(rows[0].get("is_reserved"), Some(&FieldValue::Value(json!(0))));
        assert_eq!(rows[0].get("bike_id"), Some(&FieldValue::Value(json!(17))));
    }

    #[test]
    fn test_row_order_preserved() {
        let records: Vec<Record> = (0..20)
            .map(|i| record(json!({"bike_id": format!("b{}", i)})))
            .collect();
        let rows = project(&["bike_id"], &records);
        assert_eq!(rows.len(), 20);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(
                row.get("bike_id"),
                Some(&FieldValue::Value(json!(format!("b{}", i))))
            );
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(project(&["bike_id"], &[]).is_empty());
    }
}

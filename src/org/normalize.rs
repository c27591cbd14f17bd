use std::sync::Arc;

use rayon::prelude::*;
use serde_json::Value;

use super::{value_text, EmployeeRecord, RawRow, ID_FIELD, MANAGER_ID_FIELD};

/// Normalize one raw row. Only `Id` and `ManagerId` are touched: rendered as
/// text and trimmed. `null` or missing cells stay absent.
pub fn normalize_row(row: usize, fields: RawRow) -> EmployeeRecord {
    let id = fields.get(ID_FIELD).and_then(identifier_text);
    let manager_id = fields.get(MANAGER_ID_FIELD).and_then(identifier_text);

    EmployeeRecord {
        row,
        id,
        manager_id,
        fields,
    }
}

/// Normalize a whole sheet. Output order equals input order.
pub fn normalize_rows(rows: Vec<RawRow>) -> Vec<Arc<EmployeeRecord>> {
    rows.into_par_iter()
        .enumerate()
        .map(|(row, fields)| Arc::new(normalize_row(row, fields)))
        .collect()
}

fn identifier_text(value: &Value) -> Option<String> {
    value_text(value).map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("test row must be an object"),
        }
    }

    #[test]
    fn trims_identifiers() {
        let rec = normalize_row(0, row(json!({"Id": "  12 ", "ManagerId": "\t3\n"})));
        assert_eq!(rec.id(), Some("12"));
        assert_eq!(rec.manager_id(), Some("3"));
    }

    #[test]
    fn numeric_identifiers_become_text() {
        let rec = normalize_row(0, row(json!({"Id": 12, "ManagerId": 3.0})));
        assert_eq!(rec.id(), Some("12"));
        assert_eq!(rec.manager_id(), Some("3"));
    }

    #[test]
    fn null_and_missing_stay_absent() {
        let rec = normalize_row(0, row(json!({"Id": null, "Name": "x"})));
        assert_eq!(rec.id(), None);
        assert_eq!(rec.manager_id(), None);
    }

    #[test]
    fn whitespace_manager_is_empty_not_absent() {
        let rec = normalize_row(0, row(json!({"Id": "1", "ManagerId": "   "})));
        assert_eq!(rec.manager_id(), Some(""));
        assert_eq!(rec.manager_ref(), None);
    }

    #[test]
    fn other_fields_pass_through() {
        let rec = normalize_row(
            0,
            row(json!({"Id": "1", "Company": " УК ", "Headcount": 4, "Name": "Ivan"})),
        );
        assert_eq!(rec.fields.get("Company"), Some(&json!(" УК ")));
        assert_eq!(rec.fields.get("Headcount"), Some(&json!(4)));
        let columns: Vec<_> = rec.fields.keys().map(String::as_str).collect();
        assert_eq!(columns, vec!["Id", "Company", "Headcount", "Name"]);
    }

    #[test]
    fn batch_keeps_input_order() {
        let rows: Vec<RawRow> = (0..500)
            .map(|i| row(json!({ "Id": format!(" {} ", i) })))
            .collect();
        let records = normalize_rows(rows);
        assert_eq!(records.len(), 500);
        for (i, rec) in records.iter().enumerate() {
            assert_eq!(rec.row, i);
            assert_eq!(rec.id(), Some(i.to_string().as_str()));
        }
    }
}

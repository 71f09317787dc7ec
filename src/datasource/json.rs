//! Decoding of analytics-service JSON payloads into row sources.
//!
//! The backend's record endpoint returns an array of objects of the shape
//! `{"timestamp": <millis>, "values": {"colName": <value>, ...}}` and its
//! schema endpoint an object of `{"columns": {"colName": {"type": ...}}}`.
//! Decoding follows the service conventions: a leading underscore on a
//! column name is dropped, names are upper-cased, column order is taken
//! from the first record's `values` object, and the record timestamp is
//! appended as a trailing LONG column.
//!
//! Malformed payloads decode to an empty reader with a logged warning;
//! the transport layer owns hard failures.

use crate::datasource::memory::MemoryReader;
use crate::sql::execution::types::{ColumnType, FieldValue, Schema, SchemaColumn};
use log::warn;
use serde_json::Value;
use std::collections::HashMap;

/// Key of the per-record timestamp in the data payload, and name of the
/// synthetic trailing column it decodes into.
const TIMESTAMP_KEY: &str = "timestamp";
/// Key of the per-record column/value object.
const VALUES_KEY: &str = "values";
/// Key of the column map in the schema payload.
const COLUMNS_KEY: &str = "columns";
/// Key of a column's declared type in the schema payload.
const TYPE_KEY: &str = "type";
/// Version column the data payload carries without a schema entry.
const VERSION_KEY: &str = "version";

/// Decode a record payload into a [`MemoryReader`].
///
/// `declared_types` comes from [`column_types_from_response`]; columns the
/// schema does not cover decode with a STRING declaration.
pub fn rows_from_response(
    payload: &str,
    declared_types: &HashMap<String, ColumnType>,
) -> MemoryReader {
    let records = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!("record payload is not a JSON array");
            return MemoryReader::empty(Schema::default());
        }
        Err(err) => {
            warn!("failed to parse record payload: {}", err);
            return MemoryReader::empty(Schema::default());
        }
    };

    let mut columns: Vec<SchemaColumn> = Vec::new();
    let mut rows: Vec<Vec<FieldValue>> = Vec::new();
    for (record_index, record) in records.iter().enumerate() {
        let timestamp = record.get(TIMESTAMP_KEY).and_then(Value::as_i64);
        let values = match record.get(VALUES_KEY).and_then(Value::as_object) {
            Some(values) => values,
            None => {
                warn!("record {} has no '{}' object", record_index, VALUES_KEY);
                continue;
            }
        };
        if rows.is_empty() {
            for key in values.keys() {
                let bare = key.strip_prefix('_').unwrap_or(key);
                let data_type = declared_type_for(bare, declared_types);
                columns.push(SchemaColumn::new(bare.to_uppercase(), data_type));
            }
            columns.push(SchemaColumn::new(
                TIMESTAMP_KEY.to_uppercase(),
                ColumnType::Long,
            ));
        }
        let mut row: Vec<FieldValue> = values.values().map(value_from_json).collect();
        row.push(match timestamp {
            Some(millis) => FieldValue::Integer(millis),
            None => FieldValue::Null,
        });
        rows.push(row);
    }

    MemoryReader::new(Schema::new(columns), rows)
}

fn declared_type_for(name: &str, declared_types: &HashMap<String, ColumnType>) -> ColumnType {
    if name.eq_ignore_ascii_case(VERSION_KEY) {
        return ColumnType::String;
    }
    match declared_types
        .iter()
        .find(|(declared, _)| declared.eq_ignore_ascii_case(name))
    {
        Some((_, data_type)) => *data_type,
        None => {
            warn!("no declared type for column '{}', assuming STRING", name);
            ColumnType::String
        }
    }
}

/// Decode a schema payload into a column-name → declared-type map.
pub fn column_types_from_response(payload: &str) -> HashMap<String, ColumnType> {
    let mut types = HashMap::new();
    let root = match serde_json::from_str::<Value>(payload) {
        Ok(root) => root,
        Err(err) => {
            warn!("failed to parse schema payload: {}", err);
            return types;
        }
    };
    let columns = match root.get(COLUMNS_KEY).and_then(Value::as_object) {
        Some(columns) => columns,
        None => {
            warn!("schema payload has no '{}' object", COLUMNS_KEY);
            return types;
        }
    };
    for (name, column) in columns {
        let type_name = column.get(TYPE_KEY).and_then(Value::as_str).unwrap_or("");
        match ColumnType::parse_type_name(type_name) {
            Some(data_type) => {
                types.insert(name.clone(), data_type);
            }
            None => {
                warn!("unknown declared type '{}' for column '{}'", type_name, name);
            }
        }
    }
    types
}

/// Decode one JSON value by its runtime type. Declared types only inform
/// metadata; the row values keep the payload's own typing.
fn value_from_json(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else {
                FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => FieldValue::String(s.clone()),
        Value::Array(_) | Value::Object(_) => FieldValue::String(value.to_string()),
    }
}

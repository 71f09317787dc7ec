/*!
# Type Coercion Helpers

Bidirectional mapping between the backend's declared column type names and
the engine's runtime values, plus the LIKE-style matcher used when
filtering metadata listings by table or column name pattern.

The default literals exist for type inference: the cursor builds a
synthetic row of them to discover what runtime type a computed projection
produces (see `RowCursor::column_metadata`).
*/

use crate::sql::execution::types::{ColumnType, FieldValue};
use regex::Regex;
use rust_decimal::Decimal;

/// A representative literal of the given declared type.
///
/// BLOB, CLOB and EXPRESSION have no literal form and yield NULL, which
/// downstream type inference reports as the EXPRESSION marker.
pub fn default_literal(data_type: ColumnType) -> FieldValue {
    match data_type {
        ColumnType::String => FieldValue::String(String::new()),
        ColumnType::Boolean => FieldValue::Boolean(false),
        ColumnType::Byte | ColumnType::Short | ColumnType::Integer | ColumnType::Long => {
            FieldValue::Integer(1)
        }
        ColumnType::Float | ColumnType::Double => FieldValue::Float(1.0),
        ColumnType::BigDecimal => FieldValue::Decimal(Decimal::ONE),
        ColumnType::Date => FieldValue::Date(Default::default()),
        ColumnType::Time => FieldValue::Time(Default::default()),
        ColumnType::Timestamp => FieldValue::Timestamp(Default::default()),
        ColumnType::AsciiStream => FieldValue::Bytes(Vec::new()),
        ColumnType::Blob | ColumnType::Clob | ColumnType::Expression => FieldValue::Null,
    }
}

/// The declared type corresponding to a value's runtime type.
///
/// The engine's collapsed numeric families map onto their widest declared
/// spelling (LONG, DOUBLE). NULL has no type.
pub fn sql_type_of(value: &FieldValue) -> Option<ColumnType> {
    match value {
        FieldValue::Null => None,
        FieldValue::Boolean(_) => Some(ColumnType::Boolean),
        FieldValue::Integer(_) => Some(ColumnType::Long),
        FieldValue::Float(_) => Some(ColumnType::Double),
        FieldValue::Decimal(_) => Some(ColumnType::BigDecimal),
        FieldValue::String(_) => Some(ColumnType::String),
        FieldValue::Date(_) => Some(ColumnType::Date),
        FieldValue::Time(_) => Some(ColumnType::Time),
        FieldValue::Timestamp(_) => Some(ColumnType::Timestamp),
        FieldValue::Bytes(_) => Some(ColumnType::AsciiStream),
    }
}

/// Match a LIKE-style pattern against an input, honoring an escape string.
///
/// `%` matches any run of characters, `_` any single character; a
/// character preceded by the escape is taken literally. A pattern without
/// wildcards degenerates to plain equality.
pub fn like_matches(pattern: &str, escape: &str, input: &str) -> bool {
    if !pattern.contains('%') && !pattern.contains('_') {
        return pattern == input;
    }
    let escape_char = escape.chars().next();
    let mut regex_text = String::from("^");
    let mut escaped = false;
    for ch in pattern.chars() {
        if !escaped && Some(ch) == escape_char {
            escaped = true;
            continue;
        }
        if escaped {
            regex_text.push_str(&regex::escape(&ch.to_string()));
            escaped = false;
        } else {
            match ch {
                '%' => regex_text.push_str(".*"),
                '_' => regex_text.push('.'),
                _ => regex_text.push_str(&regex::escape(&ch.to_string())),
            }
        }
    }
    regex_text.push('$');
    match Regex::new(&regex_text) {
        Ok(re) => re.is_match(input),
        Err(_) => false,
    }
}

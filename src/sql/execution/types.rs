/*!
# Core Execution Data Types

The fundamental data types used throughout the query core:

- [`FieldValue`] - closed scalar value union covering every type the
  analytics backend can deliver in a row
- [`Row`] - one record, keyed by upper-cased column name
- [`Schema`] / [`SchemaColumn`] - the declared shape of a row source
- [`ColumnType`] - the backend's declared column type names

Rows are produced by a row source and are immutable once built. All column
name handling in the crate is case-insensitive with upper case as the
canonical form.
*/

use crate::sql::error::SqlError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Display size reported for columns when the source declares none.
pub const DEFAULT_COLUMN_SIZE: u32 = 100;

/// A scalar value in a row field.
///
/// This enum is the closed set of scalar types the engine understands.
/// There is no open-ended "object" escape hatch: every coercion is an
/// explicit function on this union.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// SQL NULL
    Null,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer (covers the backend's BYTE through LONG types)
    Integer(i64),
    /// 64-bit floating point (covers FLOAT and DOUBLE)
    Float(f64),
    /// Arbitrary-precision decimal
    Decimal(Decimal),
    /// UTF-8 string
    String(String),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Date and time, no zone
    Timestamp(NaiveDateTime),
    /// Raw byte stream (ASCIISTREAM columns)
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Whether this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Short name of the value's runtime type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Decimal(_) => "decimal",
            FieldValue::String(_) => "string",
            FieldValue::Date(_) => "date",
            FieldValue::Time(_) => "time",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::Bytes(_) => "bytes",
        }
    }

    /// Compare two values under the natural ordering of their scalar type.
    ///
    /// The numeric family (Integer, Float, Decimal) is mutually comparable;
    /// every other cross-type pairing is a type error. NULL on either side
    /// is a type error here as well — callers that want three-valued
    /// semantics check for NULL before comparing.
    pub fn try_compare(&self, other: &FieldValue) -> Result<Ordering, SqlError> {
        use FieldValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => Ok(a.cmp(b)),
            (Float(a), Float(b)) => Ok(a.total_cmp(b)),
            (Decimal(a), Decimal(b)) => Ok(a.cmp(b)),
            (Integer(a), Float(b)) => Ok((*a as f64).total_cmp(b)),
            (Float(a), Integer(b)) => Ok(a.total_cmp(&(*b as f64))),
            (Integer(a), Decimal(b)) => Ok(rust_decimal::Decimal::from(*a).cmp(b)),
            (Decimal(a), Integer(b)) => Ok(a.cmp(&rust_decimal::Decimal::from(*b))),
            (Float(a), Decimal(b)) => Ok(a.total_cmp(&b.to_f64().unwrap_or(f64::NAN))),
            (Decimal(a), Float(b)) => Ok(a.to_f64().unwrap_or(f64::NAN).total_cmp(b)),
            (String(a), String(b)) => Ok(a.cmp(b)),
            (Boolean(a), Boolean(b)) => Ok(a.cmp(b)),
            (Date(a), Date(b)) => Ok(a.cmp(b)),
            (Time(a), Time(b)) => Ok(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Ok(a.cmp(b)),
            (Bytes(a), Bytes(b)) => Ok(a.cmp(b)),
            _ => Err(SqlError::type_error(
                self.type_name(),
                other.type_name(),
                Some(other.to_string()),
            )),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "NULL"),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Decimal(d) => write!(f, "{}", d),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Date(d) => write!(f, "{}", d),
            FieldValue::Time(t) => write!(f, "{}", t),
            FieldValue::Timestamp(ts) => write!(f, "{}", ts),
            FieldValue::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

/// Serialization keeps full fidelity for driver-level callers: dates,
/// timestamps and decimals become their display strings, bytes an array.
impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Float(v) => serializer.serialize_f64(*v),
            FieldValue::Decimal(d) => serializer.serialize_str(&d.to_string()),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            FieldValue::Time(t) => serializer.serialize_str(&t.format("%H:%M:%S").to_string()),
            FieldValue::Timestamp(ts) => {
                serializer.serialize_str(&ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
            }
            FieldValue::Bytes(b) => serializer.serialize_bytes(b),
        }
    }
}

/// One record of column-name → value pairs. Keys are upper-cased by the
/// row source that builds the map.
pub type Row = HashMap<String, FieldValue>;

/// Declared column type names of the analytics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    String,
    Boolean,
    Byte,
    Short,
    /// Accepts both `INT` and `INTEGER` spellings
    Integer,
    Long,
    Float,
    Double,
    BigDecimal,
    Date,
    Time,
    Timestamp,
    AsciiStream,
    Blob,
    Clob,
    /// Marker for computed projections whose type cannot be inferred
    Expression,
}

impl ColumnType {
    /// Parse a declared type name, case-insensitively.
    pub fn parse_type_name(name: &str) -> Option<ColumnType> {
        match name.to_ascii_uppercase().as_str() {
            "STRING" => Some(ColumnType::String),
            "BOOLEAN" => Some(ColumnType::Boolean),
            "BYTE" => Some(ColumnType::Byte),
            "SHORT" => Some(ColumnType::Short),
            "INT" | "INTEGER" => Some(ColumnType::Integer),
            "LONG" => Some(ColumnType::Long),
            "FLOAT" => Some(ColumnType::Float),
            "DOUBLE" => Some(ColumnType::Double),
            "BIGDECIMAL" => Some(ColumnType::BigDecimal),
            "DATE" => Some(ColumnType::Date),
            "TIME" => Some(ColumnType::Time),
            "TIMESTAMP" => Some(ColumnType::Timestamp),
            "ASCIISTREAM" => Some(ColumnType::AsciiStream),
            "BLOB" => Some(ColumnType::Blob),
            "CLOB" => Some(ColumnType::Clob),
            "EXPRESSION" => Some(ColumnType::Expression),
            _ => None,
        }
    }

    /// Canonical upper-case name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::String => "STRING",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Byte => "BYTE",
            ColumnType::Short => "SHORT",
            ColumnType::Integer => "INT",
            ColumnType::Long => "LONG",
            ColumnType::Float => "FLOAT",
            ColumnType::Double => "DOUBLE",
            ColumnType::BigDecimal => "BIGDECIMAL",
            ColumnType::Date => "DATE",
            ColumnType::Time => "TIME",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::AsciiStream => "ASCIISTREAM",
            ColumnType::Blob => "BLOB",
            ColumnType::Clob => "CLOB",
            ColumnType::Expression => "EXPRESSION",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One column of a row source's declared schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaColumn {
    /// Column name as declared by the source
    pub name: String,
    /// Declared type
    pub data_type: ColumnType,
    /// Display size
    pub size: u32,
}

impl SchemaColumn {
    /// Create a column with the default display size.
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        SchemaColumn {
            name: name.into(),
            data_type,
            size: DEFAULT_COLUMN_SIZE,
        }
    }
}

/// Ordered list of declared columns describing a physical row source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    columns: Vec<SchemaColumn>,
}

impl Schema {
    /// Build a schema from an ordered column list.
    pub fn new(columns: Vec<SchemaColumn>) -> Self {
        Schema { columns }
    }

    /// Convenience constructor from (name, type) pairs.
    pub fn from_pairs<N: Into<String>>(pairs: impl IntoIterator<Item = (N, ColumnType)>) -> Self {
        Schema {
            columns: pairs
                .into_iter()
                .map(|(name, data_type)| SchemaColumn::new(name, data_type))
                .collect(),
        }
    }

    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in declared order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Case-insensitive lookup of a declared column.
    pub fn find(&self, name: &str) -> Option<&SchemaColumn> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

//! In-memory row source backed by a schema and a row vector.

use crate::datasource::RowSource;
use crate::sql::error::{SqlError, SqlResult};
use crate::sql::execution::types::{FieldValue, Row, Schema};

/// A [`RowSource`] over rows fully materialized in memory, in the order
/// the backend delivered them.
#[derive(Debug, Clone)]
pub struct MemoryReader {
    schema: Schema,
    rows: Vec<Vec<FieldValue>>,
    row_index: Option<usize>,
}

impl MemoryReader {
    /// Create a reader over `rows`, each row ordered like `schema`.
    pub fn new(schema: Schema, rows: Vec<Vec<FieldValue>>) -> Self {
        MemoryReader {
            schema,
            rows,
            row_index: None,
        }
    }

    /// A reader with a schema but no rows.
    pub fn empty(schema: Schema) -> Self {
        MemoryReader::new(schema, Vec::new())
    }

    /// Number of rows in the source.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for MemoryReader {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_row(&mut self) -> SqlResult<bool> {
        let next = match self.row_index {
            None => 0,
            Some(index) => index + 1,
        };
        self.row_index = Some(next);
        Ok(next < self.rows.len())
    }

    fn environment(&self) -> SqlResult<Row> {
        let row = self
            .row_index
            .and_then(|index| self.rows.get(index))
            .ok_or(SqlError::CursorNotPositioned)?;
        let mut env = Row::new();
        for (column, value) in self.schema.columns().iter().zip(row.iter()) {
            env.insert(column.name.to_uppercase(), value.clone());
        }
        Ok(env)
    }
}

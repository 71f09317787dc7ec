//! Row sources feeding the query cursor.
//!
//! A [`RowSource`] is a forward-only pull over rows that already live in
//! memory, together with the declared schema describing them. The cursor
//! consumes a source sequentially and exactly once per execution.

pub mod json;
pub mod memory;

use crate::sql::error::SqlResult;
use crate::sql::execution::types::{Row, Schema};

pub use memory::MemoryReader;

/// A forward-only source of in-memory rows.
pub trait RowSource {
    /// Declared schema of the rows this source yields.
    fn schema(&self) -> &Schema;

    /// Advance to the next row. Returns false once the source is drained.
    fn next_row(&mut self) -> SqlResult<bool>;

    /// The current row as a column-name → value map, keys upper-cased.
    fn environment(&self) -> SqlResult<Row>;

    /// Alias under which qualified column references may address the
    /// table, if the source carries one.
    fn table_alias(&self) -> Option<&str> {
        None
    }

    /// Release any resources held by the source.
    fn close(&mut self) {}
}

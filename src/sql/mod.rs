// Planning and execution for the restricted SELECT dialect.

pub mod ast;
pub mod error;
pub mod execution;
pub mod planner;

// Re-export main API
pub use error::{SqlError, SqlResult};
pub use execution::cursor::{ColumnMeta, RowCursor};
pub use execution::types::{ColumnType, FieldValue, Row, Schema, SchemaColumn};
pub use planner::{plan, Projection, QueryPlan};

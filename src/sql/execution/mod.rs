// Execution engine: value model, expression evaluation, aggregation,
// cursor protocol and type coercion.

pub mod aggregation;
pub mod coercion;
pub mod cursor;
pub mod expression;
pub mod types;

pub use aggregation::{Accumulator, AggregateFunction};
pub use cursor::{ColumnMeta, RowCursor};
pub use expression::{CompareOp, Expr};
pub use types::{ColumnType, FieldValue, Row, Schema, SchemaColumn};

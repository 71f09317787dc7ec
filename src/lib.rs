/*!
# rowquery

An embedded query-execution core that answers a restricted SQL `SELECT`
dialect against tabular rows already materialized in memory — typically
rows a driver has fetched from a remote analytics backend before handing
them to this crate.

The crate owns the computation of such a driver and nothing else: query
planning, typed expression evaluation, WHERE filtering, the COUNT / SUM /
MIN / MAX aggregates, and the row-cursor protocol that unifies streaming
and aggregate result delivery. SQL text parsing, network retrieval and the
client-protocol surface are external collaborators.

## Features

- **Single-table SELECT** with projection lists, `*` expansion against the
  concrete schema, and qualified-name stripping
- **Three-valued WHERE evaluation**: `AND` / `OR` over relational
  comparisons with SQL null semantics; rows match only when the predicate
  is strictly true
- **Aggregates** (`COUNT`, `SUM`, `MIN`, `MAX`) with per-execution
  accumulator state, computed in one buffering pass that yields a single
  result row through the ordinary cursor protocol
- **Typed values** over a closed scalar union (`FieldValue`), with
  explicit coercions instead of runtime type tests
- **Column metadata derivation** for driver-level result-set reporting

## Quick Start

```rust
use rowquery::datasource::MemoryReader;
use rowquery::sql::ast::{ParsedSelect, SelectItem};
use rowquery::{ColumnType, FieldValue, RowCursor, Schema};

let schema = Schema::from_pairs([
    ("name", ColumnType::String),
    ("price", ColumnType::Integer),
]);
let reader = MemoryReader::new(
    schema,
    vec![
        vec![FieldValue::String("disk".into()), FieldValue::Integer(90)],
        vec![FieldValue::String("lamp".into()), FieldValue::Integer(40)],
    ],
);

let stmt = ParsedSelect::new("products", vec![SelectItem::wildcard()]);
let plan = rowquery::sql::plan(&stmt, &[])?;
let mut cursor = RowCursor::open(plan, reader, 0, -1)?;
while cursor.next()? {
    let name = cursor.value(cursor.find_column("name")?)?;
    println!("{}", name);
}
cursor.close();
# Ok::<(), rowquery::SqlError>(())
```
*/

pub mod datasource;
pub mod sql;

pub use datasource::{MemoryReader, RowSource};
pub use sql::error::{SqlError, SqlResult};
pub use sql::execution::cursor::{ColumnMeta, RowCursor};
pub use sql::execution::types::{ColumnType, FieldValue, Row, Schema, SchemaColumn};
pub use sql::planner::{Projection, QueryPlan};

/// Open a cursor for one execution of `plan` over `reader`.
///
/// `max_rows` is the caller-set row ceiling (0 = unbounded); `limit` is
/// the query-level row limit (negative = unbounded). Equivalent to
/// [`RowCursor::open`].
pub fn open_cursor<R: RowSource>(
    plan: QueryPlan,
    reader: R,
    max_rows: usize,
    limit: i64,
) -> SqlResult<RowCursor<R>> {
    RowCursor::open(plan, reader, max_rows, limit)
}

/*!
# Row Cursor

[`RowCursor`] drives one execution of a [`QueryPlan`] over a
[`RowSource`]: it expands surviving wildcards against the concrete schema,
applies the WHERE filter row by row, and enforces the caller's row
ceilings.

Two delivery modes share the cursor protocol:

- **streaming** (no aggregates): each `next()` pulls from the source until
  a row satisfies the WHERE predicate (strictly true — unknown and false
  both skip the row) or the source runs out
- **buffered** (any aggregate projection): construction runs one
  exhaustive scan, feeding every surviving row into the per-projection
  accumulator table, then synthesizes a single sentinel row; the first
  `next()` yields it, the second reports end of data

Exhaustion is latched: once the tail is hit, later calls never rescan.
`close()` is idempotent and every subsequent operation fails with
`CursorClosed`.
*/

use crate::datasource::RowSource;
use crate::sql::error::{SqlError, SqlResult};
use crate::sql::execution::aggregation::Accumulator;
use crate::sql::execution::coercion::{default_literal, sql_type_of};
use crate::sql::execution::expression::Expr;
use crate::sql::execution::types::{ColumnType, FieldValue, Row, DEFAULT_COLUMN_SIZE};
use crate::sql::planner::{expand_wildcard_projections, validate_projections, QueryPlan};
use log::debug;
use serde::Serialize;

/// Type and size information derived for one projected column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMeta {
    pub name: String,
    pub label: String,
    pub data_type: ColumnType,
    pub display_size: u32,
}

/// A forward-only cursor over one query execution.
#[derive(Debug)]
pub struct RowCursor<R: RowSource> {
    reader: R,
    plan: QueryPlan,
    /// Raw columns referenced only by the WHERE clause; kept alive in the
    /// per-row environment so predicates on non-projected columns work.
    filter_columns: Vec<String>,
    /// Aggregate state, keyed by projection index. Fresh per execution.
    accumulators: Vec<(usize, Accumulator)>,
    /// The single sentinel row of buffered (aggregate) mode.
    buffered_rows: Option<Vec<Row>>,
    record_env: Option<Row>,
    current_row: usize,
    /// Caller-set ceiling; 0 means unbounded.
    max_rows: usize,
    /// Query-level row limit; negative means unbounded.
    limit: i64,
    hit_tail: bool,
    closed: bool,
}

impl<R: RowSource> RowCursor<R> {
    /// Open a cursor for one execution of `plan` over `reader`.
    ///
    /// Wildcards that survived planning are expanded against the reader's
    /// schema here, before any row is pulled. When the plan contains
    /// aggregates the full buffering scan also runs here, so construction
    /// cost is the whole input for aggregate queries.
    pub fn open(plan: QueryPlan, reader: R, max_rows: usize, limit: i64) -> SqlResult<Self> {
        let mut plan = plan;
        let column_names = reader.schema().column_names();
        let expanded = expand_wildcard_projections(&mut plan.projections, &column_names)?;
        if expanded {
            validate_projections(&plan.projections)?;
        }

        let filter_columns = plan
            .where_clause
            .as_ref()
            .map(|clause| clause.filtered_columns())
            .unwrap_or_default();

        let accumulators: Vec<(usize, Accumulator)> = plan
            .projections
            .iter()
            .enumerate()
            .filter_map(|(index, projection)| match &projection.expr {
                Expr::Aggregate { function, arg } => {
                    Some((index, Accumulator::new(*function, arg)))
                }
                _ => None,
            })
            .collect();

        let mut cursor = RowCursor {
            reader,
            plan,
            filter_columns,
            accumulators,
            buffered_rows: None,
            record_env: None,
            current_row: 0,
            max_rows,
            limit,
            hit_tail: false,
            closed: false,
        };
        if !cursor.accumulators.is_empty() {
            cursor.run_aggregate_scan()?;
        }
        Ok(cursor)
    }

    /// Exhaustively consume the source through the WHERE and row-ceiling
    /// gates, feeding each surviving row into every accumulator, then
    /// install the one-row sentinel source.
    fn run_aggregate_scan(&mut self) -> SqlResult<()> {
        let mut scanned = 0usize;
        while self.stream_next()? {
            scanned += 1;
            if let Some(record) = &self.record_env {
                for (index, accumulator) in self.accumulators.iter_mut() {
                    if let Expr::Aggregate { arg, .. } = &self.plan.projections[*index].expr {
                        accumulator.update(arg.eval(record))?;
                    }
                }
            }
        }
        debug!(
            "aggregate scan over '{}' consumed {} row(s)",
            self.plan.table, scanned
        );
        self.buffered_rows = Some(vec![Row::new()]);
        self.record_env = None;
        self.current_row = 0;
        Ok(())
    }

    /// Advance to the next result row. Returns false at end of data.
    pub fn next(&mut self) -> SqlResult<bool> {
        self.check_open()?;
        if let Some(buffered) = &self.buffered_rows {
            if self.current_row < buffered.len() {
                self.record_env = Some(buffered[self.current_row].clone());
                self.current_row += 1;
                return Ok(true);
            }
            self.record_env = None;
            self.hit_tail = true;
            return Ok(false);
        }
        self.stream_next()
    }

    /// Streaming-mode pull: one source row that passes the WHERE filter,
    /// bounded by the row ceilings.
    fn stream_next(&mut self) -> SqlResult<bool> {
        let ceiling_reached = (self.max_rows != 0 && self.current_row >= self.max_rows)
            || (self.limit >= 0 && self.current_row >= self.limit as usize);
        let mut has_next = if ceiling_reached || self.hit_tail {
            false
        } else {
            self.pull_row()?
        };

        if self.plan.where_clause.is_some() {
            while has_next && !self.current_row_matches() {
                has_next = self.pull_row()?;
            }
        }

        if has_next {
            self.current_row += 1;
        } else {
            self.record_env = None;
            self.hit_tail = true;
        }
        Ok(has_next)
    }

    fn pull_row(&mut self) -> SqlResult<bool> {
        let has_next = self.reader.next_row()?;
        self.record_env = if has_next {
            Some(self.reader.environment()?)
        } else {
            None
        };
        Ok(has_next)
    }

    /// Whether the currently pulled row satisfies the WHERE clause,
    /// strictly: unknown counts as a miss.
    fn current_row_matches(&self) -> bool {
        match &self.plan.where_clause {
            Some(clause) => {
                let env = self.object_environment();
                clause.is_true(&env) == Some(true)
            }
            None => true,
        }
    }

    /// The per-row evaluation environment: every projection's value keyed
    /// by upper-cased output name, plus the raw WHERE-only columns.
    fn object_environment(&self) -> Row {
        let mut env = Row::new();
        let record = match &self.record_env {
            Some(record) => record,
            None => return env,
        };
        for projection in &self.plan.projections {
            env.insert(projection.name.to_uppercase(), projection.expr.eval(record));
        }
        for column in &self.filter_columns {
            if let Some(value) = record.get(column) {
                env.insert(column.clone(), value.clone());
            }
        }
        env
    }

    /// Evaluate the projection at `index` (0-based) against the current row.
    pub fn value(&self, index: usize) -> SqlResult<FieldValue> {
        self.check_open()?;
        let count = self.plan.projections.len();
        if index >= count {
            return Err(SqlError::ColumnIndexOutOfRange { index, count });
        }
        if self.current_row == 0 {
            return Err(SqlError::CursorNotPositioned);
        }
        if let Some((_, accumulator)) = self.accumulators.iter().find(|(i, _)| *i == index) {
            return Ok(accumulator.finish());
        }
        match &self.record_env {
            Some(record) => Ok(self.plan.projections[index].expr.eval(record)),
            None => Ok(FieldValue::Null),
        }
    }

    /// Locate a projection by output name, case-insensitively (0-based).
    pub fn find_column(&self, name: &str) -> SqlResult<usize> {
        self.check_open()?;
        if name.is_empty() {
            return Err(SqlError::ColumnNotFound {
                name: name.to_string(),
            });
        }
        self.plan
            .projections
            .iter()
            .position(|projection| projection.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SqlError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Number of projected columns.
    pub fn column_count(&self) -> usize {
        self.plan.projections.len()
    }

    /// One-based number of the current row, 0 before the first `next()`.
    pub fn row_number(&self) -> usize {
        self.current_row
    }

    /// Derive type and size metadata for every projected column.
    ///
    /// Bare column references borrow the declared type and size of their
    /// schema entry. Computed projections are typed by evaluating against
    /// a synthetic all-defaults row (aggregates by their accumulator's
    /// result value); a NULL result falls back to the EXPRESSION marker.
    pub fn column_metadata(&self) -> SqlResult<Vec<ColumnMeta>> {
        self.check_open()?;
        let schema = self.reader.schema();

        let mut synthetic = Row::new();
        let table_key = self.plan.table.to_uppercase();
        let alias = self.reader.table_alias().map(str::to_string);
        for column in schema.columns() {
            let literal = default_literal(column.data_type);
            let key = column.name.to_uppercase();
            synthetic.insert(format!("{}.{}", table_key, key), literal.clone());
            if let Some(alias) = &alias {
                synthetic.insert(format!("{}.{}", alias, key), literal.clone());
            }
            synthetic.insert(key, literal);
        }

        let mut metadata = Vec::with_capacity(self.plan.projections.len());
        for (index, projection) in self.plan.projections.iter().enumerate() {
            let declared = match &projection.expr {
                Expr::Column(name) => schema.find(name),
                _ => None,
            };
            let (data_type, display_size) = match declared {
                Some(column) => (column.data_type, column.size),
                None => {
                    let value = match self.accumulators.iter().find(|(i, _)| *i == index) {
                        Some((_, accumulator)) => accumulator.finish(),
                        None => projection.expr.eval(&synthetic),
                    };
                    (
                        sql_type_of(&value).unwrap_or(ColumnType::Expression),
                        DEFAULT_COLUMN_SIZE,
                    )
                }
            };
            metadata.push(ColumnMeta {
                name: projection.name.clone(),
                label: projection.name.clone(),
                data_type,
                display_size,
            });
        }
        Ok(metadata)
    }

    /// Release the cursor. Idempotent; buffered rows are dropped and every
    /// later operation fails with `CursorClosed`.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.reader.close();
        self.record_env = None;
        self.buffered_rows = None;
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_open(&self) -> SqlResult<()> {
        if self.closed {
            Err(SqlError::CursorClosed)
        } else {
            Ok(())
        }
    }
}

/*!
# Query Planner

Turns the external parser's output ([`ParsedSelect`]) into an executable
[`QueryPlan`]: the table name, an ordered projection list and an optional
WHERE expression tree.

Planning fails fast, before any row source I/O:

- anything but a single-table SELECT is a syntax error (joins are
  unconditionally rejected)
- mixing aggregate and plain-column projections is a validation error
- operator tokens outside the supported relational set are syntax errors

Wildcard projections are expanded against the schema column hint when one
is available; a plan built without the hint keeps its wildcard sentinel and
the cursor finishes the expansion against the concrete schema.
*/

use crate::sql::ast::{ParsedCondition, ParsedOperand, ParsedSelect, SelectItem};
use crate::sql::error::{SqlError, SqlResult};
use crate::sql::execution::aggregation::AggregateFunction;
use crate::sql::execution::expression::{CompareOp, Expr};
use log::debug;

/// One (output name, expression) pair of the select list.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Output column name: the bare column name, or the original item text
    /// for aggregates.
    pub name: String,
    pub expr: Expr,
}

impl Projection {
    pub fn new(name: impl Into<String>, expr: Expr) -> Self {
        Projection {
            name: name.into(),
            expr,
        }
    }
}

/// An executable single-table SELECT. Immutable once planned.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// Table named in the FROM clause.
    pub table: String,
    /// Ordered projection list; never empty.
    pub projections: Vec<Projection>,
    /// WHERE predicate, if present.
    pub where_clause: Option<Expr>,
}

impl QueryPlan {
    /// Whether any projection is an aggregate.
    pub fn has_aggregates(&self) -> bool {
        self.projections.iter().any(|p| p.expr.is_aggregate())
    }
}

/// Plan a parsed SELECT statement.
///
/// `schema_columns` is the ordered column-name hint used to expand `*`
/// projections at plan time; pass an empty slice when the schema is not
/// known yet and the cursor will expand instead.
pub fn plan(stmt: &ParsedSelect, schema_columns: &[String]) -> SqlResult<QueryPlan> {
    let table = match stmt.from.as_slice() {
        [single] => single.table.clone(),
        [] => return Err(SqlError::syntax_error("statement has no FROM item")),
        _ => return Err(SqlError::syntax_error("joins are not supported")),
    };

    let mut projections = Vec::new();
    if stmt.items.is_empty() {
        projections.push(Projection::new("*", Expr::Wildcard("*".to_string())));
    } else {
        for item in &stmt.items {
            projections.push(plan_select_item(item, &table)?);
        }
    }

    let where_clause = match &stmt.where_clause {
        Some(condition) => Some(build_where_expr(condition)?),
        None => None,
    };

    if !schema_columns.is_empty() {
        expand_wildcard_projections(&mut projections, schema_columns)?;
    }
    validate_projections(&projections)?;

    debug!(
        "planned SELECT on '{}': {} projection(s), where={}",
        table,
        projections.len(),
        where_clause.is_some()
    );

    Ok(QueryPlan {
        table,
        projections,
        where_clause,
    })
}

fn plan_select_item(item: &SelectItem, table: &str) -> SqlResult<Projection> {
    if let Some(func_name) = &item.aggregate {
        let function = AggregateFunction::parse(func_name).ok_or_else(|| {
            SqlError::syntax_error(format!("unsupported aggregate function '{}'", func_name))
        })?;
        let argument = item.column.as_deref().ok_or_else(|| {
            SqlError::syntax_error(format!("aggregate '{}' has no argument", func_name))
        })?;
        let arg = if argument == "*" {
            Expr::Wildcard("*".to_string())
        } else {
            Expr::column(argument)
        };
        return Ok(Projection::new(
            item.expression.clone(),
            Expr::Aggregate {
                function,
                arg: Box::new(arg),
            },
        ));
    }

    match item.column.as_deref() {
        Some("*") => Ok(Projection::new("*", Expr::Wildcard("*".to_string()))),
        Some(column) => {
            let bare = strip_qualifiers(column, table);
            Ok(Projection::new(bare, Expr::column(bare)))
        }
        None => Err(SqlError::syntax_error(format!(
            "unsupported select item '{}'",
            item.expression
        ))),
    }
}

/// Drop `table.` and `schema.table.` qualifier prefixes from a column name.
fn strip_qualifiers<'a>(column: &'a str, table: &str) -> &'a str {
    let mut name = column;
    let table_prefix_matches = name
        .get(..table.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(table));
    if table_prefix_matches {
        if let Some(stripped) = name[table.len()..].strip_prefix('.') {
            name = stripped;
        }
    }
    if let Some(dot) = name.rfind('.') {
        name = &name[dot + 1..];
    }
    name
}

/// Map the parsed WHERE tree onto an expression tree.
///
/// A top-level `AND`/`OR` combines relational operands; any other operator
/// means the tree itself is a single relational condition.
fn build_where_expr(condition: &ParsedCondition) -> SqlResult<Expr> {
    if condition.operator.eq_ignore_ascii_case("AND") {
        Ok(Expr::And(relational_operands(condition)?))
    } else if condition.operator.eq_ignore_ascii_case("OR") {
        Ok(Expr::Or(relational_operands(condition)?))
    } else {
        build_relational_expr(condition)
    }
}

fn relational_operands(condition: &ParsedCondition) -> SqlResult<Vec<Expr>> {
    condition
        .operands
        .iter()
        .map(|operand| match operand {
            ParsedOperand::Condition(nested) => build_relational_expr(nested),
            ParsedOperand::Text(text) => Err(SqlError::syntax_error(format!(
                "expected a condition operand, got '{}'",
                text
            ))),
        })
        .collect()
}

fn build_relational_expr(condition: &ParsedCondition) -> SqlResult<Expr> {
    let op = CompareOp::parse(&condition.operator).ok_or_else(|| {
        SqlError::syntax_error(format!("unsupported operator '{}'", condition.operator))
    })?;
    let (left, right) = match condition.operands.as_slice() {
        [left, right] => (operand_text(left)?, operand_text(right)?),
        _ => {
            return Err(SqlError::syntax_error(format!(
                "operator '{}' requires two operands",
                condition.operator
            )))
        }
    };
    Ok(Expr::Comparison {
        op,
        left: Box::new(Expr::column(left)),
        right: Box::new(Expr::string_literal(strip_quotes(right))),
    })
}

fn operand_text(operand: &ParsedOperand) -> SqlResult<&str> {
    operand
        .as_text()
        .ok_or_else(|| SqlError::syntax_error("nested conditions are not supported here"))
}

/// Strip one layer of surrounding single quotes; each end independently,
/// matching the upstream parser's literal rendering.
fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('\'').unwrap_or(text);
    text.strip_suffix('\'').unwrap_or(text)
}

/// Replace top-level `*` projections with one column reference per schema
/// column, preserving schema order. Returns whether anything expanded.
pub(crate) fn expand_wildcard_projections(
    projections: &mut Vec<Projection>,
    column_names: &[String],
) -> SqlResult<bool> {
    let mut expanded = false;
    let mut index = 0;
    while index < projections.len() {
        if let Expr::Wildcard(token) = &projections[index].expr {
            if token != "*" {
                return Err(SqlError::validation_error(
                    "invalid wildcard token",
                    Some(token.clone()),
                ));
            }
            let replacements = column_names
                .iter()
                .map(|name| Projection::new(name.clone(), Expr::column(name.as_str())));
            projections.splice(index..=index, replacements);
            index += column_names.len();
            expanded = true;
        } else {
            index += 1;
        }
    }
    Ok(expanded)
}

/// Reject plans that mix aggregate projections with plain columns.
pub(crate) fn validate_projections(projections: &[Projection]) -> SqlResult<()> {
    if !projections.iter().any(|p| p.expr.is_aggregate()) {
        return Ok(());
    }
    let plain_column = projections
        .iter()
        .filter(|p| !p.expr.is_aggregate())
        .flat_map(|p| p.expr.filtered_columns())
        .next();
    if let Some(column) = plain_column {
        return Err(SqlError::validation_error(
            "aggregate functions cannot be mixed with plain columns",
            Some(column),
        ));
    }
    Ok(())
}

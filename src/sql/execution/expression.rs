/*!
# Expression Tree and Evaluation

[`Expr`] is the closed expression variant set the planner produces: column
references, literals, the planning-time wildcard sentinel, boolean
conjunction/disjunction, relational comparisons, and aggregate wrappers.
A single match in [`Expr::eval`] / [`Expr::is_true`] covers every variant,
so adding one is a compile-time exhaustiveness error everywhere it matters.

Predicate evaluation is three-valued: [`Expr::is_true`] returns
`Option<bool>`, where `None` is SQL's "unknown". Unknown propagates the
standard way — `AND` yields false as soon as one operand is false and
unknown if any operand was unknown, `OR` dually — and a WHERE clause only
accepts rows whose predicate is strictly `Some(true)`.

Expressions are pure: aggregate nodes are inert descriptors here, their
accumulation state lives in the cursor's per-execution accumulator table.
*/

use crate::sql::execution::aggregation::AggregateFunction;
use crate::sql::execution::types::{FieldValue, Row};
use std::cmp::Ordering;

/// Relational comparison operators.
///
/// Alternate spellings (`!=`, `=<`, `=>`) collapse onto the same variant
/// as their canonical forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    LtEq,
    GtEq,
}

impl CompareOp {
    /// Parse an operator token as written in the statement.
    pub fn parse(token: &str) -> Option<CompareOp> {
        match token {
            "=" => Some(CompareOp::Eq),
            "<>" | "!=" => Some(CompareOp::NotEq),
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            "<=" | "=<" => Some(CompareOp::LtEq),
            ">=" | "=>" => Some(CompareOp::GtEq),
            _ => None,
        }
    }

    /// Canonical token for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "<>",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::GtEq => ">=",
        }
    }

    /// Apply the operator to a signed comparison result.
    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::NotEq => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::LtEq => ordering != Ordering::Greater,
            CompareOp::GtEq => ordering != Ordering::Less,
        }
    }
}

/// A node of the query expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a row column, stored upper-cased.
    Column(String),
    /// A literal value (WHERE right-hand operands are string literals).
    Literal(FieldValue),
    /// The `*` select token, carrying its original text. Planning-time
    /// sentinel only: expanded against the schema before rows flow.
    Wildcard(String),
    /// Conjunction of relational operands.
    And(Vec<Expr>),
    /// Disjunction of relational operands.
    Or(Vec<Expr>),
    /// Relational comparison.
    Comparison {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Aggregate call wrapping its argument expression. Pure descriptor;
    /// accumulation state is keyed by projection index in the cursor.
    Aggregate {
        function: AggregateFunction,
        arg: Box<Expr>,
    },
}

impl Expr {
    /// A column reference; the name is upper-cased to match row keys.
    pub fn column(name: impl Into<String>) -> Expr {
        Expr::Column(name.into().to_uppercase())
    }

    /// A string literal, as produced for WHERE right-hand operands.
    pub fn string_literal(value: impl Into<String>) -> Expr {
        Expr::Literal(FieldValue::String(value.into()))
    }

    /// Whether this node is an aggregate wrapper.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Expr::Aggregate { .. })
    }

    /// Evaluate the expression against one row.
    ///
    /// Total over all variants: a missing column is NULL, not an error.
    /// Aggregate nodes evaluate to NULL — their value is produced by the
    /// cursor's accumulator table, never by tree evaluation.
    pub fn eval(&self, row: &Row) -> FieldValue {
        match self {
            Expr::Column(name) => row.get(name).cloned().unwrap_or(FieldValue::Null),
            Expr::Literal(value) => value.clone(),
            Expr::Wildcard(_) => FieldValue::Null,
            Expr::And(_) | Expr::Or(_) | Expr::Comparison { .. } => match self.is_true(row) {
                Some(b) => FieldValue::Boolean(b),
                None => FieldValue::Null,
            },
            Expr::Aggregate { .. } => FieldValue::Null,
        }
    }

    /// Evaluate the expression as a three-valued predicate.
    ///
    /// Only boolean-shaped nodes (AND, OR, comparisons) have a defined
    /// truth value; everything else is unknown.
    pub fn is_true(&self, row: &Row) -> Option<bool> {
        match self {
            Expr::And(operands) => {
                let mut unknown = false;
                for operand in operands {
                    match operand.is_true(row) {
                        Some(false) => return Some(false),
                        None => unknown = true,
                        Some(true) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(true)
                }
            }
            Expr::Or(operands) => {
                let mut unknown = false;
                for operand in operands {
                    match operand.is_true(row) {
                        Some(true) => return Some(true),
                        None => unknown = true,
                        Some(false) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(false)
                }
            }
            Expr::Comparison { op, left, right } => {
                let left_value = left.eval(row);
                let right_value = right.eval(row);
                compare_values(&left_value, &right_value).map(|ordering| op.holds(ordering))
            }
            _ => None,
        }
    }

    /// Base column names this expression reads from the raw row.
    ///
    /// Used to keep WHERE-only columns alive in the per-row evaluation
    /// environment. Aggregates, wildcards and literals contribute nothing.
    pub fn filtered_columns(&self) -> Vec<String> {
        match self {
            Expr::Column(name) => vec![name.clone()],
            Expr::Literal(_) | Expr::Wildcard(_) | Expr::Aggregate { .. } => Vec::new(),
            Expr::And(operands) | Expr::Or(operands) => operands
                .iter()
                .flat_map(|operand| operand.filtered_columns())
                .collect(),
            Expr::Comparison { left, right, .. } => {
                let mut columns = left.filtered_columns();
                columns.extend(right.filtered_columns());
                columns
            }
        }
    }
}

/// Compare two scalar values the way the relational operators do.
///
/// `None` is "unknown": either side NULL, or a failed numeric coercion.
/// The left value's runtime type picks the comparison mode:
///
/// - string: lexicographic against the right value's display string
/// - boolean: the right value's display string is parsed as a boolean
///   (case-insensitive `true`; anything else is false), with false < true
/// - anything else: both display strings parsed as f64 and compared
///   numerically; a parse failure (or NaN) degrades to unknown rather
///   than raising
pub fn compare_values(left: &FieldValue, right: &FieldValue) -> Option<Ordering> {
    if left.is_null() || right.is_null() {
        return None;
    }
    match left {
        FieldValue::String(l) => Some(l.cmp(&right.to_string())),
        FieldValue::Boolean(l) => {
            let r = right.to_string().eq_ignore_ascii_case("true");
            Some(l.cmp(&r))
        }
        _ => {
            let l: f64 = left.to_string().parse().ok()?;
            let r: f64 = right.to_string().parse().ok()?;
            l.partial_cmp(&r)
        }
    }
}

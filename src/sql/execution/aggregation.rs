/*!
# Aggregate Accumulators

One [`Accumulator`] instance exists per aggregate projection per query
execution, held in the cursor's accumulator table and keyed by projection
index. The expression tree itself stays pure; nothing here is shared
between executions.

Per-row behavior matches the backend driver contract:

- `COUNT(*)` counts every surviving row; `COUNT(col)` counts non-NULL
  evaluations. Counting is never de-duplicated (DISTINCT is unsupported).
- `SUM` accumulates into an arbitrary-precision decimal; a row whose value
  does not parse as a number contributes nothing, silently.
- `MIN`/`MAX` retain the best value under the scalar types' natural
  ordering; an incomparable pair aborts the query with a type error.
*/

use crate::sql::error::SqlResult;
use crate::sql::execution::expression::Expr;
use crate::sql::execution::types::FieldValue;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// The aggregate functions of the supported dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
    Min,
    Max,
}

impl AggregateFunction {
    /// Parse an aggregate function name, case-insensitively.
    pub fn parse(name: &str) -> Option<AggregateFunction> {
        match name.to_ascii_uppercase().as_str() {
            "COUNT" => Some(AggregateFunction::Count),
            "SUM" => Some(AggregateFunction::Sum),
            "MIN" => Some(AggregateFunction::Min),
            "MAX" => Some(AggregateFunction::Max),
            _ => None,
        }
    }

    /// Canonical upper-case name.
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }
}

/// Mutable per-execution state of one aggregate projection.
#[derive(Debug, Clone)]
pub enum Accumulator {
    Count {
        /// True for `COUNT(*)`: every row counts, NULL or not.
        count_rows: bool,
        counter: i64,
    },
    Sum {
        /// Unset until the first parseable value arrives.
        total: Option<Decimal>,
    },
    Min {
        best: Option<FieldValue>,
    },
    Max {
        best: Option<FieldValue>,
    },
}

impl Accumulator {
    /// Fresh accumulator for an aggregate projection.
    pub fn new(function: AggregateFunction, arg: &Expr) -> Accumulator {
        match function {
            AggregateFunction::Count => Accumulator::Count {
                count_rows: matches!(arg, Expr::Wildcard(_)),
                counter: 0,
            },
            AggregateFunction::Sum => Accumulator::Sum { total: None },
            AggregateFunction::Min => Accumulator::Min { best: None },
            AggregateFunction::Max => Accumulator::Max { best: None },
        }
    }

    /// Feed one surviving row's evaluated argument into the accumulator.
    pub fn update(&mut self, value: FieldValue) -> SqlResult<()> {
        match self {
            Accumulator::Count {
                count_rows,
                counter,
            } => {
                if *count_rows || !value.is_null() {
                    *counter += 1;
                }
            }
            Accumulator::Sum { total } => {
                if !value.is_null() {
                    if let Some(amount) = parse_decimal(&value.to_string()) {
                        *total = Some(total.unwrap_or_default() + amount);
                    }
                    // Unparsable values contribute nothing, by contract.
                }
            }
            Accumulator::Min { best } => {
                update_best(best, value, Ordering::Less)?;
            }
            Accumulator::Max { best } => {
                update_best(best, value, Ordering::Greater)?;
            }
        }
        Ok(())
    }

    /// The aggregate's final scalar, once every row has been consumed.
    pub fn finish(&self) -> FieldValue {
        match self {
            Accumulator::Count { counter, .. } => FieldValue::Integer(*counter),
            Accumulator::Sum { total } => match total {
                None => FieldValue::Null,
                Some(total) => {
                    if total.fract().is_zero() {
                        if let Some(exact) = total.to_i64() {
                            return FieldValue::Integer(exact);
                        }
                    }
                    FieldValue::Float(total.to_f64().unwrap_or(f64::INFINITY))
                }
            },
            Accumulator::Min { best } | Accumulator::Max { best } => {
                best.clone().unwrap_or(FieldValue::Null)
            }
        }
    }
}

/// Replace `best` when `value` compares on the wanted side of it.
fn update_best(
    best: &mut Option<FieldValue>,
    value: FieldValue,
    wanted: Ordering,
) -> SqlResult<()> {
    if value.is_null() {
        return Ok(());
    }
    let replace = match best {
        None => true,
        Some(current) => value.try_compare(current)? == wanted,
    };
    if replace {
        *best = Some(value);
    }
    Ok(())
}

/// Parse a display string into a decimal, accepting scientific notation.
fn parse_decimal(text: &str) -> Option<Decimal> {
    text.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

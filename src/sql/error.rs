/*!
# SQL Error Handling

Error types for query planning and cursor execution. Every fallible
operation in the crate returns [`SqlResult`], and each error variant carries
the context needed to report the failure to a driver-level caller: the
offending column name, the out-of-range index, the incompatible types.

Planning errors (`SyntaxError`, `ValidationError`) are raised before any row
is pulled from a source. Cursor-protocol misuse (`CursorNotPositioned`,
`CursorClosed`, `ColumnIndexOutOfRange`, `ColumnNotFound`) is always a hard
error. Per-row coercion failures inside SUM and relational comparison are
deliberately NOT errors — those degrade locally (the row contributes
nothing, the predicate resolves to unknown).
*/

use std::fmt;

/// Result alias used throughout the crate.
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised by query planning and cursor execution.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlError {
    /// The statement has an unsupported shape (multi-table FROM, missing
    /// FROM, unrecognized relational operator).
    SyntaxError {
        /// Human-readable description of the unsupported construct
        message: String,
    },

    /// The statement is well-formed but invalid: aggregate and plain-column
    /// projections mixed, or a wildcard token other than `*`.
    ValidationError {
        /// Description of the validation failure
        message: String,
        /// Column or token that caused the failure, if applicable
        column: Option<String>,
    },

    /// Two scalar values could not be compared or converted.
    TypeError {
        /// Expected type or type family
        expected: String,
        /// Actual type encountered
        actual: String,
        /// The value that caused the error, if available
        value: Option<String>,
    },

    /// A column label was not found among the cursor's projections.
    ColumnNotFound {
        /// The label that was looked up
        name: String,
    },

    /// A projection index was outside the cursor's column range.
    ColumnIndexOutOfRange {
        /// The index that was requested
        index: usize,
        /// Number of projected columns
        count: usize,
    },

    /// A value was read before the first successful `next()`.
    CursorNotPositioned,

    /// The cursor (or its owning session) was closed.
    CursorClosed,
}

impl SqlError {
    /// Create a syntax error.
    pub fn syntax_error(message: impl Into<String>) -> Self {
        SqlError::SyntaxError {
            message: message.into(),
        }
    }

    /// Create a validation error with an optional offending column.
    pub fn validation_error(message: impl Into<String>, column: Option<String>) -> Self {
        SqlError::ValidationError {
            message: message.into(),
            column,
        }
    }

    /// Create a type error from expected/actual type names.
    pub fn type_error(
        expected: impl Into<String>,
        actual: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        SqlError::TypeError {
            expected: expected.into(),
            actual: actual.into(),
            value,
        }
    }
}

impl fmt::Display for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlError::SyntaxError { message } => {
                write!(f, "SQL syntax error: {}", message)
            }
            SqlError::ValidationError { message, column } => {
                if let Some(col) = column {
                    write!(f, "Invalid query for column '{}': {}", col, message)
                } else {
                    write!(f, "Invalid query: {}", message)
                }
            }
            SqlError::TypeError {
                expected,
                actual,
                value,
            } => {
                if let Some(val) = value {
                    write!(
                        f,
                        "Type error: expected {}, got {} for value '{}'",
                        expected, actual, val
                    )
                } else {
                    write!(f, "Type error: expected {}, got {}", expected, actual)
                }
            }
            SqlError::ColumnNotFound { name } => {
                write!(f, "Invalid column name: '{}'", name)
            }
            SqlError::ColumnIndexOutOfRange { index, count } => {
                write!(
                    f,
                    "Column index {} out of range for {} projected columns",
                    index, count
                )
            }
            SqlError::CursorNotPositioned => {
                write!(f, "Cursor is not positioned on a row; call next() first")
            }
            SqlError::CursorClosed => {
                write!(f, "Cursor has been closed")
            }
        }
    }
}

impl std::error::Error for SqlError {}

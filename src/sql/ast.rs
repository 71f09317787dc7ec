/*!
# Parsed Statement Contract

The SQL grammar and tokenizer live outside this crate; a driver-level
adapter runs them and hands the resulting parse tree to the planner through
the types in this module. The shape deliberately mirrors what a generic SQL
parser produces for a single-table SELECT:

- an ordered select-item list, each item carrying the original item text,
  an optional column name and an optional aggregate function name
- a FROM-item list (table names)
- an optional WHERE tree of operator + operand lists, where each operand is
  either a nested condition or raw operand text

Nothing here is validated; the planner owns all shape checks.
*/

/// A parsed single-statement SELECT, as produced by the external parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSelect {
    /// Items of the select list, in statement order. Empty means `SELECT *`.
    pub items: Vec<SelectItem>,
    /// FROM clause entries. Anything but exactly one is rejected by the
    /// planner.
    pub from: Vec<FromItem>,
    /// Top-level WHERE tree, if a WHERE clause was present.
    pub where_clause: Option<ParsedCondition>,
}

impl ParsedSelect {
    /// A SELECT over one table with the given items and no WHERE clause.
    pub fn new(table: impl Into<String>, items: Vec<SelectItem>) -> Self {
        ParsedSelect {
            items,
            from: vec![FromItem {
                table: table.into(),
            }],
            where_clause: None,
        }
    }

    /// Attach a WHERE tree.
    pub fn with_where(mut self, condition: ParsedCondition) -> Self {
        self.where_clause = Some(condition);
        self
    }
}

/// One item of the select list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    /// The item exactly as it appeared in the statement, e.g. `COUNT(*)`
    /// or `t.price`. Used as the output name of aggregate projections.
    pub expression: String,
    /// Column name (or `*`) referenced by the item, if any.
    pub column: Option<String>,
    /// Aggregate function name, if the item is an aggregate call.
    pub aggregate: Option<String>,
}

impl SelectItem {
    /// A plain column reference item.
    pub fn column(name: impl Into<String>) -> Self {
        let name = name.into();
        SelectItem {
            expression: name.clone(),
            column: Some(name),
            aggregate: None,
        }
    }

    /// An aggregate call item, e.g. `aggregate("COUNT", "*")`.
    pub fn aggregate(function: impl Into<String>, argument: impl Into<String>) -> Self {
        let function = function.into();
        let argument = argument.into();
        SelectItem {
            expression: format!("{}({})", function, argument),
            column: Some(argument),
            aggregate: Some(function),
        }
    }

    /// The `*` select item.
    pub fn wildcard() -> Self {
        SelectItem {
            expression: "*".to_string(),
            column: Some("*".to_string()),
            aggregate: None,
        }
    }
}

/// One FROM clause entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FromItem {
    /// Referenced table name.
    pub table: String,
}

/// A node of the parsed WHERE tree: an operator applied to operands.
///
/// The top-level node's operator is `AND`/`OR` (with relational operands)
/// or itself a relational operator (with two text operands).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCondition {
    /// Operator token as written: `AND`, `OR`, `=`, `<>`, `>`, ...
    pub operator: String,
    /// Operand list, left to right.
    pub operands: Vec<ParsedOperand>,
}

impl ParsedCondition {
    /// A binary relational condition over two raw operand texts.
    pub fn relation(
        operator: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        ParsedCondition {
            operator: operator.into(),
            operands: vec![
                ParsedOperand::Text(left.into()),
                ParsedOperand::Text(right.into()),
            ],
        }
    }

    /// A boolean combination of nested conditions.
    pub fn combine(operator: impl Into<String>, operands: Vec<ParsedCondition>) -> Self {
        ParsedCondition {
            operator: operator.into(),
            operands: operands.into_iter().map(ParsedOperand::Condition).collect(),
        }
    }
}

/// An operand of a [`ParsedCondition`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOperand {
    /// A nested condition (operand of AND/OR).
    Condition(ParsedCondition),
    /// Raw operand text (column name or literal) of a relational operator.
    Text(String),
}

impl ParsedOperand {
    /// The operand's raw text, if it is a text operand.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParsedOperand::Text(text) => Some(text),
            ParsedOperand::Condition(_) => None,
        }
    }
}

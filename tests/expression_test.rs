//! Tests for expression evaluation: relational comparison semantics and
//! three-valued AND/OR logic.

use rowquery::sql::execution::expression::{compare_values, CompareOp, Expr};
use rowquery::sql::execution::types::{FieldValue, Row};

fn test_row(fields: Vec<(&str, FieldValue)>) -> Row {
    let mut row = Row::new();
    for (key, value) in fields {
        row.insert(key.to_uppercase(), value);
    }
    row
}

fn comparison(op: CompareOp, column: &str, literal: &str) -> Expr {
    Expr::Comparison {
        op,
        left: Box::new(Expr::column(column)),
        right: Box::new(Expr::string_literal(literal)),
    }
}

#[test]
fn test_numeric_comparison_beats_lexicographic_for_numbers() {
    // An INT-typed column compares numerically: 10 > 9.
    let row = test_row(vec![("n", FieldValue::Integer(10))]);
    let expr = comparison(CompareOp::Gt, "n", "9");
    assert_eq!(expr.is_true(&row), Some(true));
}

#[test]
fn test_string_comparison_is_lexicographic() {
    // The same digits in a STRING-typed column compare as text: "10" < "9".
    let row = test_row(vec![("n", FieldValue::String("10".to_string()))]);
    let expr = comparison(CompareOp::Gt, "n", "9");
    assert_eq!(expr.is_true(&row), Some(false));
}

#[test]
fn test_boolean_comparison_parses_right_operand() {
    let row = test_row(vec![("flag", FieldValue::Boolean(true))]);
    assert_eq!(
        comparison(CompareOp::Eq, "flag", "true").is_true(&row),
        Some(true)
    );
    assert_eq!(
        comparison(CompareOp::Eq, "flag", "TRUE").is_true(&row),
        Some(true)
    );
    // false < true under boolean ordering
    assert_eq!(
        comparison(CompareOp::Gt, "flag", "false").is_true(&row),
        Some(true)
    );
}

#[test]
fn test_null_operand_yields_unknown() {
    let row = test_row(vec![("n", FieldValue::Null)]);
    assert_eq!(comparison(CompareOp::Eq, "n", "1").is_true(&row), None);
    // A missing column evaluates to NULL, and NULL comparisons are unknown.
    assert_eq!(comparison(CompareOp::Eq, "absent", "1").is_true(&row), None);
}

#[test]
fn test_failed_numeric_coercion_yields_unknown_not_error() {
    let row = test_row(vec![("n", FieldValue::Integer(7))]);
    assert_eq!(comparison(CompareOp::Gt, "n", "pickle").is_true(&row), None);
}

#[test]
fn test_all_operators_against_signed_comparison() {
    let row = test_row(vec![("n", FieldValue::Integer(5))]);
    let cases = [
        (CompareOp::Eq, "5", true),
        (CompareOp::NotEq, "5", false),
        (CompareOp::Gt, "4", true),
        (CompareOp::Lt, "6", true),
        (CompareOp::LtEq, "5", true),
        (CompareOp::GtEq, "5", true),
        (CompareOp::Gt, "5", false),
        (CompareOp::Lt, "5", false),
    ];
    for (op, literal, expected) in cases {
        assert_eq!(
            comparison(op, "n", literal).is_true(&row),
            Some(expected),
            "{:?} against {}",
            op,
            literal
        );
    }
}

#[test]
fn test_operator_token_spellings() {
    assert_eq!(CompareOp::parse("="), Some(CompareOp::Eq));
    assert_eq!(CompareOp::parse("<>"), Some(CompareOp::NotEq));
    assert_eq!(CompareOp::parse("!="), Some(CompareOp::NotEq));
    assert_eq!(CompareOp::parse("<="), Some(CompareOp::LtEq));
    assert_eq!(CompareOp::parse("=<"), Some(CompareOp::LtEq));
    assert_eq!(CompareOp::parse(">="), Some(CompareOp::GtEq));
    assert_eq!(CompareOp::parse("=>"), Some(CompareOp::GtEq));
    assert_eq!(CompareOp::parse("LIKE"), None);
}

#[test]
fn test_and_short_circuits_on_false() {
    let row = test_row(vec![("a", FieldValue::Integer(1))]);
    let false_leg = comparison(CompareOp::Eq, "a", "2");
    let unknown_leg = comparison(CompareOp::Eq, "missing", "1");
    // false AND unknown is false, in either order.
    assert_eq!(
        Expr::And(vec![false_leg.clone(), unknown_leg.clone()]).is_true(&row),
        Some(false)
    );
    assert_eq!(
        Expr::And(vec![unknown_leg.clone(), false_leg.clone()]).is_true(&row),
        Some(false)
    );
}

#[test]
fn test_and_three_valued_truth_table() {
    let row = test_row(vec![("a", FieldValue::Integer(1))]);
    let t = comparison(CompareOp::Eq, "a", "1");
    let u = comparison(CompareOp::Eq, "missing", "1");
    assert_eq!(Expr::And(vec![t.clone(), t.clone()]).is_true(&row), Some(true));
    assert_eq!(Expr::And(vec![t.clone(), u.clone()]).is_true(&row), None);
    assert_eq!(Expr::And(vec![u.clone(), u.clone()]).is_true(&row), None);
}

#[test]
fn test_or_three_valued_truth_table() {
    let row = test_row(vec![("a", FieldValue::Integer(1))]);
    let t = comparison(CompareOp::Eq, "a", "1");
    let f = comparison(CompareOp::Eq, "a", "2");
    let u = comparison(CompareOp::Eq, "missing", "1");
    assert_eq!(Expr::Or(vec![f.clone(), t.clone()]).is_true(&row), Some(true));
    // true OR unknown short-circuits to true.
    assert_eq!(Expr::Or(vec![t.clone(), u.clone()]).is_true(&row), Some(true));
    assert_eq!(Expr::Or(vec![u.clone(), t.clone()]).is_true(&row), Some(true));
    assert_eq!(Expr::Or(vec![f.clone(), u.clone()]).is_true(&row), None);
    assert_eq!(Expr::Or(vec![f.clone(), f.clone()]).is_true(&row), Some(false));
}

#[test]
fn test_eval_is_total_over_rows() {
    let row = test_row(vec![("a", FieldValue::Integer(1))]);
    assert_eq!(Expr::column("a").eval(&row), FieldValue::Integer(1));
    assert_eq!(Expr::column("zzz").eval(&row), FieldValue::Null);
    assert_eq!(
        Expr::string_literal("x").eval(&row),
        FieldValue::String("x".to_string())
    );
}

#[test]
fn test_column_references_are_case_insensitive() {
    let row = test_row(vec![("Price", FieldValue::Integer(3))]);
    assert_eq!(Expr::column("price").eval(&row), FieldValue::Integer(3));
    assert_eq!(Expr::column("PRICE").eval(&row), FieldValue::Integer(3));
}

#[test]
fn test_filtered_columns_collects_base_columns_only() {
    let expr = Expr::And(vec![
        comparison(CompareOp::Eq, "a", "1"),
        comparison(CompareOp::Gt, "b", "2"),
    ]);
    assert_eq!(expr.filtered_columns(), vec!["A", "B"]);
    // Literals contribute nothing.
    assert!(Expr::string_literal("1").filtered_columns().is_empty());
}

#[test]
fn test_compare_values_directly() {
    use std::cmp::Ordering;
    assert_eq!(
        compare_values(&FieldValue::Integer(10), &FieldValue::String("9".into())),
        Some(Ordering::Greater)
    );
    assert_eq!(
        compare_values(&FieldValue::String("10".into()), &FieldValue::String("9".into())),
        Some(Ordering::Less)
    );
    assert_eq!(compare_values(&FieldValue::Null, &FieldValue::Integer(1)), None);
    assert_eq!(compare_values(&FieldValue::Integer(1), &FieldValue::Null), None);
}

//! Tests for the row cursor: streaming iteration, WHERE filtering, row
//! ceilings, the buffered aggregate protocol and the close contract.

use rowquery::datasource::MemoryReader;
use rowquery::sql::ast::{ParsedCondition, ParsedSelect, SelectItem};
use rowquery::sql::execution::expression::Expr;
use rowquery::sql::planner::{plan, Projection, QueryPlan};
use rowquery::sql::SqlError;
use rowquery::{ColumnType, FieldValue, RowCursor, Schema};

fn products_schema() -> Schema {
    Schema::from_pairs([
        ("name", ColumnType::String),
        ("price", ColumnType::Long),
        ("qty", ColumnType::Integer),
    ])
}

fn product_row(name: &str, price: FieldValue, qty: i64) -> Vec<FieldValue> {
    vec![
        FieldValue::String(name.to_string()),
        price,
        FieldValue::Integer(qty),
    ]
}

fn products_reader() -> MemoryReader {
    MemoryReader::new(
        products_schema(),
        vec![
            product_row("disk", FieldValue::Integer(90), 2),
            product_row("lamp", FieldValue::Integer(40), 5),
            product_row("desk", FieldValue::Integer(150), 1),
        ],
    )
}

fn select_all() -> QueryPlan {
    let stmt = ParsedSelect::new("products", vec![SelectItem::wildcard()]);
    plan(&stmt, &[]).unwrap()
}

fn collect_names<R: rowquery::RowSource>(cursor: &mut RowCursor<R>) -> Vec<String> {
    let mut names = Vec::new();
    while cursor.next().unwrap() {
        let index = cursor.find_column("name").unwrap();
        names.push(cursor.value(index).unwrap().to_string());
    }
    names
}

#[test]
fn test_where_free_plan_yields_all_rows_in_source_order() {
    let mut cursor = RowCursor::open(select_all(), products_reader(), 0, -1).unwrap();
    assert_eq!(cursor.column_count(), 3);
    assert_eq!(collect_names(&mut cursor), vec!["disk", "lamp", "desk"]);
}

#[test]
fn test_row_ceilings_truncate_iteration() {
    let mut cursor = RowCursor::open(select_all(), products_reader(), 2, -1).unwrap();
    assert_eq!(collect_names(&mut cursor).len(), 2);

    let mut cursor = RowCursor::open(select_all(), products_reader(), 0, 1).unwrap();
    assert_eq!(collect_names(&mut cursor).len(), 1);

    let mut cursor = RowCursor::open(select_all(), products_reader(), 2, 1).unwrap();
    assert_eq!(collect_names(&mut cursor).len(), 1);
}

#[test]
fn test_exhaustion_is_latched() {
    let mut cursor = RowCursor::open(select_all(), products_reader(), 0, -1).unwrap();
    while cursor.next().unwrap() {}
    assert!(!cursor.next().unwrap());
    assert!(!cursor.next().unwrap());
}

#[test]
fn test_where_clause_filters_rows() {
    let stmt = ParsedSelect::new("products", vec![SelectItem::wildcard()])
        .with_where(ParsedCondition::relation(">", "price", "50"));
    let plan = plan(&stmt, &[]).unwrap();
    let mut cursor = RowCursor::open(plan, products_reader(), 0, -1).unwrap();
    assert_eq!(collect_names(&mut cursor), vec!["disk", "desk"]);
}

#[test]
fn test_unknown_predicate_skips_the_row() {
    let reader = MemoryReader::new(
        products_schema(),
        vec![
            product_row("disk", FieldValue::Integer(90), 2),
            product_row("mystery", FieldValue::Null, 1),
        ],
    );
    let stmt = ParsedSelect::new("products", vec![SelectItem::wildcard()])
        .with_where(ParsedCondition::relation(">", "price", "50"));
    let plan = plan(&stmt, &[]).unwrap();
    let mut cursor = RowCursor::open(plan, reader, 0, -1).unwrap();
    assert_eq!(collect_names(&mut cursor), vec!["disk"]);
}

#[test]
fn test_where_on_non_projected_column() {
    let stmt = ParsedSelect::new("products", vec![SelectItem::column("name")])
        .with_where(ParsedCondition::relation(">", "price", "50"));
    let plan = plan(&stmt, &[]).unwrap();
    let mut cursor = RowCursor::open(plan, products_reader(), 0, -1).unwrap();
    assert_eq!(cursor.column_count(), 1);
    assert_eq!(collect_names(&mut cursor), vec!["disk", "desk"]);
}

#[test]
fn test_aggregate_cursor_yields_exactly_one_row() {
    let stmt = ParsedSelect::new(
        "products",
        vec![
            SelectItem::aggregate("COUNT", "*"),
            SelectItem::aggregate("SUM", "price"),
            SelectItem::aggregate("MIN", "price"),
            SelectItem::aggregate("MAX", "price"),
        ],
    );
    let plan = plan(&stmt, &[]).unwrap();
    let mut cursor = RowCursor::open(plan, products_reader(), 0, -1).unwrap();

    assert!(cursor.next().unwrap());
    assert_eq!(cursor.value(0).unwrap(), FieldValue::Integer(3));
    assert_eq!(cursor.value(1).unwrap(), FieldValue::Integer(280));
    assert_eq!(cursor.value(2).unwrap(), FieldValue::Integer(40));
    assert_eq!(cursor.value(3).unwrap(), FieldValue::Integer(150));
    assert!(!cursor.next().unwrap());
    assert!(!cursor.next().unwrap());
}

#[test]
fn test_count_column_ignores_null_rows() {
    let reader = MemoryReader::new(
        products_schema(),
        vec![
            product_row("disk", FieldValue::Integer(90), 2),
            product_row("mystery", FieldValue::Null, 1),
            product_row("desk", FieldValue::Integer(150), 1),
        ],
    );
    let stmt = ParsedSelect::new(
        "products",
        vec![
            SelectItem::aggregate("COUNT", "*"),
            SelectItem::aggregate("COUNT", "price"),
        ],
    );
    let plan = plan(&stmt, &[]).unwrap();
    let mut cursor = RowCursor::open(plan, reader, 0, -1).unwrap();
    assert!(cursor.next().unwrap());
    assert_eq!(cursor.value(0).unwrap(), FieldValue::Integer(3));
    assert_eq!(cursor.value(1).unwrap(), FieldValue::Integer(2));
}

#[test]
fn test_aggregate_scan_respects_where_clause() {
    let stmt = ParsedSelect::new("products", vec![SelectItem::aggregate("COUNT", "*")])
        .with_where(ParsedCondition::relation(">", "price", "50"));
    let plan = plan(&stmt, &[]).unwrap();
    let mut cursor = RowCursor::open(plan, products_reader(), 0, -1).unwrap();
    assert!(cursor.next().unwrap());
    assert_eq!(cursor.value(0).unwrap(), FieldValue::Integer(2));
}

#[test]
fn test_aggregate_scan_respects_row_ceilings() {
    let stmt = ParsedSelect::new("products", vec![SelectItem::aggregate("COUNT", "*")]);
    let plan = plan(&stmt, &[]).unwrap();
    let mut cursor = RowCursor::open(plan, products_reader(), 2, -1).unwrap();
    assert!(cursor.next().unwrap());
    assert_eq!(cursor.value(0).unwrap(), FieldValue::Integer(2));
}

#[test]
fn test_value_before_next_is_an_error() {
    let cursor = RowCursor::open(select_all(), products_reader(), 0, -1).unwrap();
    assert_eq!(cursor.value(0).unwrap_err(), SqlError::CursorNotPositioned);
}

#[test]
fn test_value_with_out_of_range_index_is_an_error() {
    let mut cursor = RowCursor::open(select_all(), products_reader(), 0, -1).unwrap();
    assert!(cursor.next().unwrap());
    let err = cursor.value(99).unwrap_err();
    assert_eq!(
        err,
        SqlError::ColumnIndexOutOfRange {
            index: 99,
            count: 3
        }
    );
}

#[test]
fn test_find_column_is_case_insensitive() {
    let cursor = RowCursor::open(select_all(), products_reader(), 0, -1).unwrap();
    assert_eq!(cursor.find_column("PRICE").unwrap(), 1);
    assert_eq!(cursor.find_column("price").unwrap(), 1);
    assert!(matches!(
        cursor.find_column("nope").unwrap_err(),
        SqlError::ColumnNotFound { .. }
    ));
    assert!(matches!(
        cursor.find_column("").unwrap_err(),
        SqlError::ColumnNotFound { .. }
    ));
}

#[test]
fn test_close_is_idempotent_and_poisons_the_cursor() {
    let mut cursor = RowCursor::open(select_all(), products_reader(), 0, -1).unwrap();
    assert!(cursor.next().unwrap());
    cursor.close();
    cursor.close();
    assert!(cursor.is_closed());
    assert_eq!(cursor.next().unwrap_err(), SqlError::CursorClosed);
    assert_eq!(cursor.value(0).unwrap_err(), SqlError::CursorClosed);
    assert_eq!(cursor.find_column("name").unwrap_err(), SqlError::CursorClosed);
}

#[test]
fn test_invalid_wildcard_token_is_rejected_at_open() {
    let plan = QueryPlan {
        table: "products".to_string(),
        projections: vec![Projection::new("p.*", Expr::Wildcard("p.*".to_string()))],
        where_clause: None,
    };
    let err = RowCursor::open(plan, products_reader(), 0, -1).unwrap_err();
    assert!(matches!(err, SqlError::ValidationError { .. }));
}

#[test]
fn test_hintless_aggregate_wildcard_mix_is_caught_at_open() {
    let stmt = ParsedSelect::new(
        "products",
        vec![SelectItem::aggregate("COUNT", "*"), SelectItem::wildcard()],
    );
    let plan = plan(&stmt, &[]).unwrap();
    let err = RowCursor::open(plan, products_reader(), 0, -1).unwrap_err();
    assert!(matches!(err, SqlError::ValidationError { .. }));
}

#[test]
fn test_open_cursor_entry_point() {
    let mut cursor = rowquery::open_cursor(select_all(), products_reader(), 0, -1).unwrap();
    assert!(cursor.next().unwrap());
    assert_eq!(cursor.row_number(), 1);
}

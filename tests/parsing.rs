use std::sync::Arc;

use cypher_rows::{
    flatten5, get, BigInt, ColumnDescriptor, ConversionError, Decimal, NeoRelationship,
    ResultSetParser, Row, RowParser, WireValue,
};

fn columns(names: &[(&str, bool)]) -> Arc<[ColumnDescriptor]> {
    names
        .iter()
        .map(|(name, nullable)| ColumnDescriptor::new(*name, *nullable, "Any"))
        .collect()
}

fn person(columns: &Arc<[ColumnDescriptor]>, name: &str, age: i64, city: Option<&str>) -> Row {
    Row::new(
        Arc::clone(columns),
        vec![
            WireValue::text(name),
            WireValue::number(age),
            WireValue::from(city),
        ],
    )
    .expect("must build row")
}

fn people_columns() -> Arc<[ColumnDescriptor]> {
    columns(&[("name", false), ("age", false), ("city", true)])
}

#[test]
fn age_column_converts_to_i32() {
    let cols = columns(&[("age", false)]);
    let row = Row::new(cols, vec![WireValue::number(42)]).expect("must build row");
    assert_eq!(row.get::<i32>("age"), Ok(42));
}

#[test]
fn oversized_number_is_a_type_mismatch() {
    let cols = columns(&[("big", false)]);
    let row = Row::new(cols, vec![WireValue::number(9_999_999_999i64)]).expect("must build row");

    match row.get::<i32>("big") {
        Err(ConversionError::TypeMismatch(message)) => {
            assert!(message.ends_with("to i32 for column big"), "{message}")
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
    assert_eq!(row.get::<i64>("big"), Ok(9_999_999_999));
}

#[test]
fn missing_column_lists_available_columns() {
    let cols = columns(&[("age", false), ("city", true)]);
    let row = Row::new(cols, vec![WireValue::number(1), WireValue::text("Oslo")])
        .expect("must build row");

    assert_eq!(
        row.get::<String>("name"),
        Err(ConversionError::ColumnNotFound {
            name: "name".to_owned(),
            available: vec!["age".to_owned(), "city".to_owned()],
        })
    );
}

#[test]
fn null_city_requires_optional_target() {
    let row = person(&people_columns(), "Kit", 42, None);
    assert_eq!(
        row.get::<String>("city"),
        Err(ConversionError::UnexpectedNull {
            column: "city".to_owned()
        })
    );
    assert_eq!(row.get::<Option<String>>("city"), Ok(None));
}

#[test]
fn single_row_cardinality() {
    let cols = people_columns();
    let parser = get::<String>("name").single();

    assert_eq!(parser.parse(&[]), Err(ConversionError::EmptyResultSet));
    assert_eq!(
        parser.parse(&[
            person(&cols, "Kit", 42, None),
            person(&cols, "Ana", 35, None)
        ]),
        Err(ConversionError::Mapping("more than one row".to_owned()))
    );
    assert_eq!(
        parser.parse(&[person(&cols, "Kit", 42, None)]),
        Ok("Kit".to_owned())
    );
}

#[test]
fn mixed_list_rejects_whole_column() {
    let cols = columns(&[("tags", false)]);
    let row = Row::new(
        cols,
        vec![WireValue::list([WireValue::text("a"), WireValue::number(1)])],
    )
    .expect("must build row");

    assert!(matches!(
        row.get::<Vec<String>>("tags"),
        Err(ConversionError::InnerTypeMismatch(_))
    ));
    assert_eq!(
        row.get::<Vec<WireValue>>("tags").map(|tags| tags.len()),
        Ok(2)
    );
}

#[test]
fn list_parser_reports_first_failing_row() {
    let cols = columns(&[("age", false)]);
    let rows = vec![
        Row::new(Arc::clone(&cols), vec![WireValue::number(1)]).expect("must build row"),
        Row::new(Arc::clone(&cols), vec![WireValue::text("x")]).expect("must build row"),
        Row::new(Arc::clone(&cols), vec![WireValue::Null]).expect("must build row"),
    ];

    let err = get::<i64>("age").many().parse(&rows).expect_err("must fail");
    assert!(matches!(err, ConversionError::TypeMismatch(_)));
}

#[test]
fn five_column_parser_flattens_in_order() {
    let cols = columns(&[
        ("id", false),
        ("name", false),
        ("score", false),
        ("total", false),
        ("rel", false),
    ]);
    let row = Row::new(
        cols,
        vec![
            WireValue::number(1),
            WireValue::text("Kit"),
            WireValue::Number(cypher_rows::Number::from_literal("12.50")),
            WireValue::Number(cypher_rows::Number::from_literal("98765432109876543210")),
            WireValue::map([
                ("self", WireValue::text("http://h/db/data/relationship/9")),
                ("start", WireValue::text("http://h/db/data/node/1")),
                ("end", WireValue::text("http://h/db/data/node/2")),
                ("type", WireValue::text("KNOWS")),
            ]),
        ],
    )
    .expect("must build row");

    let parser: RowParser<(i64, String, Decimal, BigInt, NeoRelationship)> = get("id")
        .and(get("name"))
        .and(get("score"))
        .and(get("total"))
        .and(get("rel"))
        .map(flatten5);

    let (id, name, score, total, rel) = parser.parse(&row).expect("must parse");
    assert_eq!((id, name.as_str()), (1, "Kit"));
    assert_eq!(score.normalized(), Decimal::new(125, 1));
    assert_eq!(total.to_string(), "98765432109876543210");
    assert_eq!((rel.start, rel.end, rel.rel_type.as_str()), (1, 2, "KNOWS"));
}

#[test]
fn custom_result_set_parser_folds_rows() {
    let cols = people_columns();
    let rows = [
        person(&cols, "Kit", 42, Some("Oslo")),
        person(&cols, "Ana", 35, None),
    ];

    let age = get::<i64>("age");
    let oldest = ResultSetParser::new(move |rows: &[Row]| {
        let mut best: Option<i64> = None;
        for row in rows {
            let value = age.parse(row)?;
            best = Some(best.map_or(value, |current| current.max(value)));
        }
        best.ok_or(ConversionError::EmptyResultSet)
    });

    assert_eq!(oldest.parse(&rows), Ok(42));
    assert_eq!(oldest.parse(&[]), Err(ConversionError::EmptyResultSet));
}

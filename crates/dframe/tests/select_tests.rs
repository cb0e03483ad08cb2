use dframe::{Column, ColumnType, FrameError, Index, Table, Value};
use dframe_test::{ColumnAsserts, TableAsserts};

#[test]
fn select_without_sentinels_keeps_specialization() {
    let column = Column::for_longs(vec![3, 4, 2]);
    let selected = column.select(&[Some(2), Some(1)]).expect("select");
    ColumnAsserts::new(&selected)
        .expect_type(ColumnType::Long)
        .expect_data([2i64, 4]);
}

#[test]
fn select_with_sentinel_degrades_to_object() {
    let column = Column::for_longs(vec![3, 4, 2]);
    let selected = column.select(&[Some(2), Some(1), None]).expect("select");
    ColumnAsserts::new(&selected)
        .expect_type(ColumnType::Object)
        .expect_data([Value::Long(2), Value::Long(4), Value::Null])
        .expect_nulls_at(&[2]);
}

#[test]
fn sequence_select() {
    let column = Column::for_sequence(10, 15);
    ColumnAsserts::new(&column.select(&[Some(4), Some(0)]).expect("select"))
        .expect_type(ColumnType::Int)
        .expect_data([14, 10]);
    ColumnAsserts::new(&column.select(&[None, Some(1)]).expect("select"))
        .expect_type(ColumnType::Object)
        .expect_data([Value::Null, Value::Int(11)]);
}

#[test]
fn select_out_of_range_fails() {
    let column = Column::for_doubles(vec![1.0, 2.0]);
    assert_eq!(
        column.select(&[Some(0), Some(2)]).unwrap_err(),
        FrameError::IndexOutOfBounds { index: 2, len: 2 }
    );
}

#[test]
fn table_row_selection_applies_to_every_column() {
    let table = Table::new(
        Index::for_labels(["i", "s"]).expect("labels"),
        vec![Column::for_ints(vec![1, 2, 3]), Column::for_data(["a", "b", "c"])],
    )
    .expect("table");

    let selected = table.select_rows(&[Some(2), None, Some(0)]).expect("select");
    let asserts = TableAsserts::new(&selected, &["i", "s"]).expect_rows(&[
        vec![Value::Int(3), Value::from("c")],
        vec![Value::Null, Value::Null],
        vec![Value::Int(1), Value::from("a")],
    ]);
    asserts.column("i").expect_type(ColumnType::Object);
}

#[test]
fn column_projection_and_views_share_storage() {
    let table = Table::new(
        Index::for_labels(["i", "d"]).expect("labels"),
        vec![
            Column::for_ints((0..100).collect()),
            Column::for_doubles((0..100).map(f64::from).collect()),
        ],
    )
    .expect("table");
    let source = table.column("d").expect("d");

    let projected = table.select_columns(["d"]).expect("project");
    assert!(projected.column("d").expect("d").shares_storage_with(source));

    let tail = table.tail(10);
    assert_eq!(tail.height(), 10);
    assert!(tail.column("d").expect("d").shares_storage_with(source));
    assert_eq!(tail.get(0, "i").expect("cell"), Value::Int(90));

    let mut buffer = [0.0; 3];
    tail.column("d")
        .expect("d")
        .copy_to_double(&mut buffer, 7, 0, 3)
        .expect("copy");
    assert_eq!(buffer, [97.0, 98.0, 99.0]);
}

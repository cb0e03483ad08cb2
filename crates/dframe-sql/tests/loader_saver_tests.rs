use dframe::{Column, ColumnType, Index, Table, Value};
use dframe_sql::{ConnectionProvider, ConnectorConfig, DataSource, SqlConnector, SqlError};
use dframe_test::TableAsserts;
use pretty_assertions::assert_eq;

const CREATE_T1: &str =
    "CREATE TABLE t1 (id INTEGER, name TEXT, salary REAL, note)";

fn sample() -> Table {
    Table::new(
        Index::for_labels(["id", "name", "salary", "note"]).expect("labels"),
        vec![
            Column::for_longs(vec![1, 2, 3]),
            Column::for_data(["a", "b", "c"]),
            Column::for_doubles(vec![0.5, 1.5, 2.5]),
            Column::for_values(vec![Value::Null, Value::from("x"), Value::Bool(true)]),
        ],
    )
    .expect("table")
}

#[test]
fn save_then_load_keeps_declared_types() {
    let connector = SqlConnector::open(ConnectorConfig::default()).expect("open");
    connector.sql(CREATE_T1).update().expect("create");

    let saved = connector.table_saver("t1").save(&sample()).expect("save");
    assert_eq!(saved, 3);

    let loaded = connector.table_loader("t1").load().expect("load");
    let asserts = TableAsserts::new(&loaded, &["id", "name", "salary", "note"]).expect_rows(&[
        vec![Value::Long(1), Value::from("a"), Value::Double(0.5), Value::Null],
        vec![Value::Long(2), Value::from("b"), Value::Double(1.5), Value::from("x")],
        vec![Value::Long(3), Value::from("c"), Value::Double(2.5), Value::Long(1)],
    ]);
    asserts.column("id").expect_type(ColumnType::Long);
    asserts.column("salary").expect_type(ColumnType::Double);
    asserts.column("name").expect_type(ColumnType::Object);
}

#[test]
fn loader_column_subset_and_row_limit() {
    let connector = SqlConnector::open(ConnectorConfig::default()).expect("open");
    connector.sql(CREATE_T1).update().expect("create");
    connector.table_saver("t1").save(&sample()).expect("save");

    let loaded = connector
        .table_loader("t1")
        .include_columns(["salary", "id"])
        .max_rows(2)
        .load()
        .expect("load");
    TableAsserts::new(&loaded, &["salary", "id"]).expect_rows(&[
        vec![Value::Double(0.5), Value::Long(1)],
        vec![Value::Double(1.5), Value::Long(2)],
    ]);
}

#[test]
fn nulls_in_typed_columns_load_as_objects() {
    let connector = SqlConnector::open(ConnectorConfig::default()).expect("open");
    connector.sql(CREATE_T1).update().expect("create");
    connector
        .sql("INSERT INTO t1 (id, salary) VALUES (1, NULL), (NULL, 2.0)")
        .update()
        .expect("insert");

    let loaded = connector
        .table_loader("t1")
        .include_columns(["id", "salary"])
        .load()
        .expect("load");
    let asserts = TableAsserts::new(&loaded, &["id", "salary"]).expect_rows(&[
        vec![Value::Long(1), Value::Null],
        vec![Value::Null, Value::Double(2.0)],
    ]);
    asserts.column("id").expect_type(ColumnType::Object);
}

#[test]
fn delete_table_data_replaces_rows() {
    let connector = SqlConnector::open(ConnectorConfig::default()).expect("open");
    connector.sql(CREATE_T1).update().expect("create");
    connector.table_saver("t1").save(&sample()).expect("save");

    let replacement = sample().head(1);
    connector
        .table_saver("t1")
        .delete_table_data()
        .save(&replacement)
        .expect("save");

    let loaded = connector.table_loader("t1").load().expect("load");
    assert_eq!(loaded.height(), 1);
}

#[test]
fn sql_loader_binds_parameters() {
    let connector = SqlConnector::open(ConnectorConfig::default()).expect("open");
    connector.sql(CREATE_T1).update().expect("create");
    connector.table_saver("t1").save(&sample()).expect("save");

    let loaded = connector
        .sql_loader("SELECT name, salary * 2 AS doubled FROM t1 WHERE id >= ?1 ORDER BY id")
        .load(&[Value::Int(2)])
        .expect("load");
    TableAsserts::new(&loaded, &["name", "doubled"]).expect_rows(&[
        vec![Value::from("b"), Value::Double(3.0)],
        vec![Value::from("c"), Value::Double(5.0)],
    ]);

    let limited = connector
        .sql_loader("SELECT id FROM t1 ORDER BY id DESC")
        .max_rows(1)
        .load(&[])
        .expect("load");
    TableAsserts::new(&limited, &["id"]).expect_rows(&[vec![Value::Long(3)]]);
}

#[test]
fn missing_table_is_a_read_error() {
    let connector = SqlConnector::open(ConnectorConfig::default()).expect("open");
    let err = connector.table_loader("nope").load().unwrap_err();
    assert!(matches!(err, SqlError::Read { .. }), "{err:?}");
    assert_eq!(err.to_string(), "Error loading data from DB");
}

#[test]
fn shared_cache_connectors_see_the_same_data() {
    let uri = "file:dframe_loader_shared?mode=memory&cache=shared";
    let writer = SqlConnector::open(ConnectorConfig::for_source(DataSource::Uri(uri.to_string())))
        .expect("open writer");
    writer.sql(CREATE_T1).update().expect("create");
    writer.table_saver("t1").save(&sample()).expect("save");

    let reader = SqlConnector::open(ConnectorConfig::for_source(DataSource::Uri(uri.to_string())))
        .expect("open reader");
    let loaded = reader.table_loader("t1").load().expect("load");
    assert_eq!(loaded.height(), 3);
}

#[test]
fn file_database_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("frames.sqlite");

    {
        let connector =
            SqlConnector::open(ConnectorConfig::for_source(DataSource::Path(path.clone())))
                .expect("open");
        connector.sql(CREATE_T1).update().expect("create");
        connector.table_saver("t1").save(&sample()).expect("save");
    }

    let connector = SqlConnector::open(ConnectorConfig::for_source(DataSource::Path(path)))
        .expect("reopen");
    let loaded = connector.table_loader("t1").load().expect("load");
    let columns = ["id", "name", "salary"];
    assert_eq!(
        loaded.select_columns(columns).expect("loaded"),
        sample().select_columns(columns).expect("expected")
    );
}

#[test]
fn open_failure_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing").join("db.sqlite");
    let err = SqlConnector::open(ConnectorConfig::for_source(DataSource::Path(path))).unwrap_err();
    assert!(matches!(err, SqlError::Open { .. }), "{err:?}");
}

#[test]
fn repeated_result_set_names_are_renamed() {
    let connector = SqlConnector::open(ConnectorConfig::default()).expect("open");
    connector
        .sql("CREATE TABLE a (id INTEGER, name TEXT)")
        .update()
        .expect("create a");
    connector
        .sql("CREATE TABLE b (id INTEGER, name TEXT)")
        .update()
        .expect("create b");
    connector
        .sql("INSERT INTO a VALUES (1, 'x'), (2, 'y')")
        .update()
        .expect("insert a");
    connector
        .sql("INSERT INTO b VALUES (2, 'z'), (3, 'w')")
        .update()
        .expect("insert b");

    let joined = connector
        .sql("SELECT * FROM a JOIN b ON a.id = b.id")
        .select()
        .expect("select");
    let asserts = TableAsserts::new(&joined, &["id", "name", "id_", "name_"]).expect_rows(&[vec![
        Value::Long(2),
        Value::from("y"),
        Value::Long(2),
        Value::from("z"),
    ]]);
    asserts.column("id_").expect_type(ColumnType::Long);
}

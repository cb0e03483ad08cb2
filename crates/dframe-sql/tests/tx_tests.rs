use dframe::{Table, Value};
use dframe_sql::{
    ConnectionProvider, ConnectorConfig, SqlConnector, SqlError, SqlResult, Tx, TxConnector,
    TxIsolation,
};
use dframe_test::TableAsserts;
use pretty_assertions::assert_eq;

fn connector() -> SqlConnector {
    let connector = SqlConnector::open(ConnectorConfig::default()).expect("open connector");
    connector
        .sql("CREATE TABLE t1 (id BIGINT, name VARCHAR(100), salary DOUBLE)")
        .update()
        .expect("create table");
    connector
}

fn employees(rows: [(i64, &str, f64); 2]) -> Table {
    let data: Vec<Value> = rows
        .iter()
        .flat_map(|(id, name, salary)| [Value::Long(*id), Value::from(*name), Value::Double(*salary)])
        .collect();
    Table::builder(["id", "name", "salary"])
        .expect("builder")
        .fold_by_row(&data)
        .expect("fold")
}

#[test]
fn run_commits_all_saves() {
    let connector = connector();
    let df1 = employees([(1, "n1", 50_000.01), (2, "n2", 120_000.0)]);
    let df2 = employees([(3, "n3", 60_000.01), (4, "n4", 1_000.0)]);

    Tx::new(&connector)
        .run(|tx| {
            tx.table_saver("t1").save(&df1)?;
            tx.table_saver("t1").save(&df2)
        })
        .expect("transaction");

    let loaded = connector
        .table_loader("t1")
        .load()
        .expect("load")
        .sort_by_column("id", true)
        .expect("sort");
    TableAsserts::new(&loaded, &["id", "name", "salary"])
        .expect_height(4)
        .expect_row(0, &[Value::Long(1), Value::from("n1"), Value::Double(50_000.01)])
        .expect_row(1, &[Value::Long(2), Value::from("n2"), Value::Double(120_000.0)])
        .expect_row(2, &[Value::Long(3), Value::from("n3"), Value::Double(60_000.01)])
        .expect_row(3, &[Value::Long(4), Value::from("n4"), Value::Double(1_000.0)]);
}

#[test]
fn failed_unit_rolls_back_earlier_saves() {
    let connector = connector();
    let df1 = employees([(1, "n1", 50_000.01), (2, "n2", 120_000.0)]);
    let df2 = employees([(3, "n3", 60_000.01), (4, "n4", 1_000.0)]);

    let result = Tx::new(&connector).run(|tx| {
        tx.table_saver("t1").save(&df1)?;
        tx.table_saver("no_such_table").save(&df2)
    });
    assert!(matches!(result, Err(SqlError::Write { .. })), "{result:?}");

    let loaded = connector.table_loader("t1").load().expect("load");
    TableAsserts::new(&loaded, &["id", "name", "salary"]).expect_height(0);
}

fn read_uncommitted(tx: &TxConnector<'_>) -> SqlResult<Value> {
    let table = tx.sql("PRAGMA read_uncommitted").select()?;
    Ok(table.get(0, 0usize)?)
}

#[test]
fn isolation_is_applied_for_the_unit_only() {
    let connector = connector();

    let inside = Tx::new(&connector)
        .isolation(TxIsolation::ReadUncommitted)
        .run(read_uncommitted)
        .expect("transaction");
    assert_eq!(inside, Value::Long(1));

    let after = Tx::new(&connector).run(read_uncommitted).expect("transaction");
    assert_eq!(after, Value::Long(0));
}

#[test]
fn unit_errors_are_returned_unchanged() {
    let connector = connector();
    let result: Result<(), _> = Tx::new(&connector).run(|_| {
        Err(SqlError::InvalidCombination("stop".to_string()))
    });
    match result {
        Err(SqlError::InvalidCombination(message)) => assert_eq!(message, "stop"),
        other => panic!("unexpected result: {other:?}"),
    }

    // The connector stays usable after a rollback.
    let loaded = connector.table_loader("t1").load().expect("load");
    assert_eq!(loaded.height(), 0);
}

use batchperf::{error::Error, ConnectOptions, Connection, DriverKind, Mode, Workload, ROW_COUNT};
use batchperf_test::{recorded_connection, run_async_test, table_exists, FailingCloseDriver};

/// NaN renders as a bare identifier, which the database rejects
fn malformed_workload(bad_row: usize) -> Workload {
    let mut rows = vec![[0.5, 0.25, 0.125]; ROW_COUNT];
    rows[bad_row] = [f64::NAN, 0.25, 0.125];

    Workload::from_rows(rows)
}

#[tokio::test]
async fn test_unbatched_stops_at_malformed_insert() {
    let (mut conn, log) = recorded_connection();
    let workload = malformed_workload(10);

    let err = batchperf::run_unbatched(&conn, &workload).await.unwrap_err();
    assert!(matches!(err, Error::Unbatched(_)), "{}", err);

    {
        let log = log.lock().unwrap();
        // create, 10 good inserts, the bad one
        assert_eq!(log.statements.len(), 12);
        assert_eq!(log.statements[..], workload.statements()[..12]);
        assert!(log.rows_before_drop.is_empty());
    }

    assert!(table_exists(&conn).await);
    assert_eq!(conn.query_u64("SELECT COUNT(*) FROM temp").await.unwrap(), 10);

    conn.close().await.unwrap();
}

#[tokio::test]
async fn test_batched_stops_at_malformed_insert() {
    let (mut conn, log) = recorded_connection();
    let workload = malformed_workload(10);

    let err = batchperf::run_batched(&conn, &workload).await.unwrap_err();
    assert!(matches!(err, Error::Batched(_)), "{}", err);

    assert!(log.lock().unwrap().rows_before_drop.is_empty());
    assert!(table_exists(&conn).await);
    assert_eq!(conn.query_u64("SELECT COUNT(*) FROM temp").await.unwrap(), 10);

    conn.close().await.unwrap();
}

#[tokio::test]
async fn test_leftover_table_fails_next_create() {
    run_async_test!((conn) => {
        batchperf::run_unbatched(&conn, &malformed_workload(0))
            .await
            .unwrap_err();

        let workload = Workload::from_rows(vec![[0.1, 0.2, 0.3]]);
        let err = batchperf::run(&conn, Mode::Batched, &workload).await.unwrap_err();
        assert!(matches!(err, Error::Batched(_)), "{}", err);
    });
}

#[tokio::test]
async fn test_connect_failure() {
    let opts = ConnectOptions::new(
        DriverKind::Sqlite,
        "sqlite:///nonexistent-batchperf-dir/nested/perf.sqlite",
    );

    let err = Connection::connect(&opts).await.err().unwrap();
    assert!(err.is_connection(), "{}", err);
}

#[tokio::test]
async fn test_driver_url_mismatch() {
    let opts = ConnectOptions::new(DriverKind::Mysql, "sqlite://memory");

    let err = Connection::connect(&opts).await.err().unwrap();
    assert!(err.is_connection(), "{}", err);
}

#[tokio::test]
async fn test_close_never_opened() {
    let mut conn = Connection::unopened();

    conn.close().await.unwrap();
    conn.close().await.unwrap();
}

#[tokio::test]
async fn test_close_twice() {
    let (mut conn, log) = recorded_connection();

    conn.close().await.unwrap();
    conn.close().await.unwrap();

    assert_eq!(log.lock().unwrap().closes, 1);
}

#[tokio::test]
async fn test_drop_releases_session() {
    let (conn, log) = recorded_connection();

    drop(conn);

    // Implicit release skips the driver close call
    assert_eq!(log.lock().unwrap().closes, 0);
    assert_eq!(std::sync::Arc::strong_count(&log), 1);
}

#[tokio::test]
async fn test_failed_close_is_not_retried() {
    let driver = FailingCloseDriver::default();
    let closes = driver.closes.clone();
    let mut conn = Connection::new(Box::new(driver));

    let err = conn.close().await.unwrap_err();
    assert!(err.is_connection(), "{}", err);

    conn.close().await.unwrap();
    assert_eq!(*closes.lock().unwrap(), 1);

    let workload = Workload::from_rows(vec![[0.1, 0.2, 0.3]]);
    let err = batchperf::run_batched(&conn, &workload).await.unwrap_err();
    assert!(matches!(err, Error::Batched(_)), "{}", err);
}

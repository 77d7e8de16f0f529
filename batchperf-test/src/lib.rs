use std::{
    future::Future,
    sync::{Arc, Mutex},
};

use batchperf::{
    conn::{driver::SqliteDriver, Driver},
    error::Result,
    ConnectOptions, Connection, Workload, TABLE_NAME,
};

pub async fn run_test<Fn, Fut>(f: Fn)
where
    Fn: FnOnce(Connection) -> Fut,
    Fut: Future<Output = Connection>,
{
    env_logger::try_init().ok();

    let conn = Connection::connect(&ConnectOptions::sqlite_memory())
        .await
        .unwrap();

    let mut conn = f(conn).await;

    conn.close().await.unwrap();
}

/// Run `$body` against a fresh in-memory database, closing it afterwards
#[macro_export]
macro_rules! run_async_test {
    (($conn:ident) => $body:block) => {
        $crate::run_test(|$conn| async move {
            $body;
            $conn
        })
        .await
    };
}

pub async fn table_exists(conn: &Connection) -> bool {
    let sql = format!(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '{}'",
        TABLE_NAME
    );

    conn.query_u64(&sql).await.unwrap() > 0
}

/// What a [`RecordingDriver`] saw
#[derive(Debug, Default)]
pub struct RecordingLog {
    /// Statement count of every driver submission
    pub submissions: Vec<usize>,
    /// Statements handed to the database, in order
    pub statements: Vec<String>,
    /// Rows in `temp` right before each drop
    pub rows_before_drop: Vec<u64>,
    pub closes: usize,
}

/// Sqlite driver that counts `temp` rows before every drop
///
/// `submissions` holds what the caller handed over. A batch ending in the drop
/// reaches the database as two calls, the rest of the batch and then the drop.
pub struct RecordingDriver {
    inner: SqliteDriver,
    log: Arc<Mutex<RecordingLog>>,
}

impl RecordingDriver {
    pub fn memory() -> (Self, Arc<Mutex<RecordingLog>>) {
        let log = Arc::new(Mutex::new(RecordingLog::default()));
        let driver = Self {
            inner: SqliteDriver::open("memory").unwrap(),
            log: log.clone(),
        };

        (driver, log)
    }

    async fn count_rows(&self) -> Result<()> {
        let count = self
            .inner
            .query_u64(&format!("SELECT COUNT(*) FROM {}", TABLE_NAME))
            .await?;
        self.log.lock().unwrap().rows_before_drop.push(count);

        Ok(())
    }
}

#[async_trait::async_trait]
impl Driver for RecordingDriver {
    async fn execute_batch(&self, mut statements: Vec<String>) -> Result<()> {
        {
            let mut log = self.log.lock().unwrap();
            log.submissions.push(statements.len());
        }

        // Split the trailing drop off so the count runs between inserts and drop
        let ends_with_drop = statements.last() == Some(&Workload::drop_sql());
        let drop = if ends_with_drop { statements.pop() } else { None };

        self.log
            .lock()
            .unwrap()
            .statements
            .extend(statements.iter().cloned());
        self.inner.execute_batch(statements).await?;

        if let Some(drop) = drop {
            self.count_rows().await?;
            self.log.lock().unwrap().statements.push(drop.clone());
            self.inner.execute(&drop).await?;
        }

        Ok(())
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        if sql == Workload::drop_sql() {
            self.count_rows().await?;
        }

        {
            let mut log = self.log.lock().unwrap();
            log.submissions.push(1);
            log.statements.push(sql.to_string());
        }

        self.inner.execute(sql).await
    }

    async fn query_u64(&self, sql: &str) -> Result<u64> {
        self.inner.query_u64(sql).await
    }

    async fn close(&self) -> Result<()> {
        self.log.lock().unwrap().closes += 1;
        self.inner.close().await
    }
}

/// In-memory connection backed by a [`RecordingDriver`]
pub fn recorded_connection() -> (Connection, Arc<Mutex<RecordingLog>>) {
    env_logger::try_init().ok();

    let (driver, log) = RecordingDriver::memory();

    (Connection::new(Box::new(driver)), log)
}

/// Driver whose `close` always fails, counting how often it ran
#[derive(Default)]
pub struct FailingCloseDriver {
    pub closes: Arc<Mutex<usize>>,
}

#[async_trait::async_trait]
impl Driver for FailingCloseDriver {
    async fn execute_batch(&self, _statements: Vec<String>) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, _sql: &str) -> Result<u64> {
        Ok(0)
    }

    async fn query_u64(&self, _sql: &str) -> Result<u64> {
        Ok(0)
    }

    async fn close(&self) -> Result<()> {
        *self.closes.lock().unwrap() += 1;

        Err(batchperf::error::connection!("Close failed"))
    }
}

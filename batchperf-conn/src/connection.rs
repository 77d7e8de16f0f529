use crate::{ConnectOptions, Driver, DriverKind, Result};

/// Exclusively owned database session.
///
/// Released by [`Connection::close`], or on drop if it was never closed.
pub struct Connection {
    driver: Option<Box<dyn Driver>>,
}

impl Connection {
    /// # Open connection
    ///
    /// Sqlite example:
    ///     - `sqlite://memory`
    ///     - `sqlite:///tmp/db.sqlite`
    ///
    /// Mysql example:
    ///     - `mysql://127.0.0.1:3306/perf`
    pub async fn connect(options: &ConnectOptions) -> Result<Self> {
        let location = options.location()?;
        log::debug!("Connect {:?}", options);

        match options.driver {
            DriverKind::Sqlite => Self::connect_sqlite(location),
            DriverKind::Mysql => Self::connect_mysql(options).await,
        }
    }

    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            driver: Some(driver),
        }
    }

    /// # A connection that was never opened
    ///
    /// Every statement fails with a connection error, closing is a no-op.
    pub fn unopened() -> Self {
        Self { driver: None }
    }

    pub fn is_open(&self) -> bool {
        self.driver.is_some()
    }

    pub async fn execute_batch(&self, statements: Vec<String>) -> Result<()> {
        self.driver()?.execute_batch(statements).await
    }

    pub async fn execute(&self, sql: &str) -> Result<u64> {
        self.driver()?.execute(sql).await
    }

    pub async fn query_u64(&self, sql: &str) -> Result<u64> {
        self.driver()?.query_u64(sql).await
    }

    /// # Release the session
    ///
    /// The driver is detached before closing, so a failed close is never
    /// retried. Closing an unopened or already closed connection succeeds.
    pub async fn close(&mut self) -> Result<()> {
        match self.driver.take() {
            Some(driver) => driver.close().await,
            None => Ok(()),
        }
    }

    fn driver(&self) -> Result<&dyn Driver> {
        self.driver
            .as_deref()
            .ok_or_else(|| batchperf_error::connection!("Connection is not open"))
    }

    #[cfg(feature = "sqlite")]
    fn connect_sqlite(path: &str) -> Result<Self> {
        let driver = crate::drivers::sqlite::SqliteDriver::open(path)?;

        Ok(Self::new(Box::new(driver)))
    }

    #[cfg(not(feature = "sqlite"))]
    fn connect_sqlite(_path: &str) -> Result<Self> {
        Err(batchperf_error::connection!("Driver `sqlite` is not enabled"))
    }

    #[cfg(feature = "mysql")]
    async fn connect_mysql(options: &ConnectOptions) -> Result<Self> {
        let driver = crate::drivers::mysql::MysqlDriver::open(
            &options.url,
            &options.username,
            &options.password,
        )
        .await?;

        Ok(Self::new(Box::new(driver)))
    }

    #[cfg(not(feature = "mysql"))]
    async fn connect_mysql(_options: &ConnectOptions) -> Result<Self> {
        Err(batchperf_error::connection!("Driver `mysql` is not enabled"))
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.driver.take().is_some() {
            log::warn!("Connection dropped without close, releasing session");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_unopened() {
        let mut conn = Connection::unopened();
        assert!(!conn.is_open());

        let err = conn.execute("SELECT 1").await.unwrap_err();
        assert!(err.is_connection());

        conn.close().await.unwrap();
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_mismatched_scheme() {
        let opts = ConnectOptions::new(DriverKind::Sqlite, "mysql://127.0.0.1/perf");
        let err = Connection::connect(&opts).await.err().unwrap();

        assert!(err.is_connection());
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_close_twice() {
        let mut conn = Connection::connect(&ConnectOptions::sqlite_memory())
            .await
            .unwrap();
        assert!(conn.is_open());

        conn.close().await.unwrap();
        assert!(!conn.is_open());
        conn.close().await.unwrap();
    }
}

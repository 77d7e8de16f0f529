mod connection;
mod drivers;
mod options;

pub use connection::Connection;
pub use options::{ConnectOptions, DriverKind};

pub mod driver {
    #[cfg(feature = "sqlite")]
    pub use crate::drivers::sqlite::SqliteDriver;

    #[cfg(feature = "mysql")]
    pub use crate::drivers::mysql::MysqlDriver;
}

pub use batchperf_error::{Error, Result};

/// A live database session.
///
/// Every call blocks on the database for its whole duration; callers await
/// one call at a time.
#[async_trait::async_trait]
pub trait Driver: Sync + Send {
    /// Submit all statements to the database as one grouped execution.
    ///
    /// Execution stops at the first failing statement.
    async fn execute_batch(&self, statements: Vec<String>) -> Result<()>;
    /// Execute a single statement, returns affected rows
    async fn execute(&self, sql: &str) -> Result<u64>;
    /// First column of the first row, for `SELECT COUNT(*)` style queries
    async fn query_u64(&self, sql: &str) -> Result<u64>;
    /// Release the session. Closing twice is not an error.
    async fn close(&self) -> Result<()>;
}

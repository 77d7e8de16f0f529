//! # Sqlite driver
//!
//! `sqlite://memory` opens an in-memory database, anything else after the
//! scheme is a file path.

use std::sync::{Arc, Mutex};

use batchperf_error::Result;
use tokio::task::spawn_blocking;

use crate::Driver;

#[derive(Clone)]
pub struct SqliteDriver {
    conn: Arc<Mutex<Option<rusqlite::Connection>>>,
}

impl SqliteDriver {
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        }
    }

    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == "memory" {
            rusqlite::Connection::open_in_memory().map_err(|e| {
                batchperf_error::connection!("Sqlite open_in_memory error: {}", e)
            })?
        } else {
            rusqlite::Connection::open(path).map_err(|e| {
                batchperf_error::connection!("Sqlite open `{}` error: {}", path, e)
            })?
        };

        Ok(Self::new(conn))
    }

    /// Run `f` on the blocking pool with the locked connection
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut rusqlite::Connection) -> Result<T> + Send + 'static,
    {
        let proxy = self.clone();
        spawn_blocking(move || {
            let mut guard = proxy.conn.lock().map_err(|e| {
                batchperf_error::connection!("SqliteDriver lock error: {}", e)
            })?;
            let conn = guard
                .as_mut()
                .ok_or_else(|| batchperf_error::connection!("Sqlite connection is closed"))?;

            f(conn)
        })
        .await
        .map_err(|e| batchperf_error::runtime!("Tokio join error: {}", e))?
    }
}

#[async_trait::async_trait]
impl Driver for SqliteDriver {
    async fn execute_batch(&self, statements: Vec<String>) -> Result<()> {
        self.with_conn(move |conn| {
            log::trace!("Execute batch of {} statements", statements.len());
            conn.execute_batch(&statements.join(";\n"))
                .map_err(|e| batchperf_error::database!("Execute batch error: {}", e))
        })
        .await
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        let sql_string = sql.to_string();
        self.with_conn(move |conn| {
            log::trace!("Execute `{}`", sql_string);
            let affected = conn.execute(&sql_string, []).map_err(|e| {
                batchperf_error::database!("Execute error: {}, sql: `{}`", e, sql_string)
            })?;

            Ok(affected as u64)
        })
        .await
    }

    async fn query_u64(&self, sql: &str) -> Result<u64> {
        let sql_string = sql.to_string();
        self.with_conn(move |conn| {
            log::trace!("Query `{}`", sql_string);
            let v = conn
                .query_row(&sql_string, [], |row| row.get::<_, i64>(0))
                .map_err(|e| {
                    batchperf_error::database!("Query error: {}, sql: `{}`", e, sql_string)
                })?;

            u64::try_from(v)
                .map_err(|e| batchperf_error::database!("Invalid count `{}`: {}", v, e))
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        let proxy = self.clone();
        spawn_blocking(move || {
            let mut guard = proxy.conn.lock().map_err(|e| {
                batchperf_error::connection!("SqliteDriver lock error: {}", e)
            })?;

            match guard.take() {
                Some(conn) => {
                    log::debug!("Close sqlite connection");
                    conn.close().map_err(|(_, e)| {
                        batchperf_error::connection!("Sqlite close error: {}", e)
                    })
                }
                None => Ok(()),
            }
        })
        .await
        .map_err(|e| batchperf_error::runtime!("Tokio join error: {}", e))?
    }
}

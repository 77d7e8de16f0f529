use std::sync::{Arc, Mutex};

use batchperf_error::Result;
use mysql_lib::prelude::Queryable;
use tokio::task::spawn_blocking;

use crate::Driver;

#[derive(Clone)]
pub struct MysqlDriver {
    conn: Arc<Mutex<Option<mysql_lib::Conn>>>,
}

impl MysqlDriver {
    pub fn new(conn: mysql_lib::Conn) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        }
    }

    /// # Open connection
    ///
    /// Non-empty `username` and `password` override the ones in `url`.
    pub async fn open(url: &str, username: &str, password: &str) -> Result<Self> {
        let opts = mysql_lib::Opts::from_url(url)
            .map_err(|e| batchperf_error::connection!("Mysql url `{}` error: {}", url, e))?;
        let mut builder = mysql_lib::OptsBuilder::from_opts(opts);
        if !username.is_empty() {
            builder = builder.user(Some(username));
        }
        if !password.is_empty() {
            builder = builder.pass(Some(password));
        }

        let url_string = url.to_string();
        let conn = spawn_blocking(move || {
            log::debug!("Connect to `{}`", url_string);
            mysql_lib::Conn::new(builder).map_err(|e| {
                batchperf_error::connection!("Mysql connect `{}` error: {}", url_string, e)
            })
        })
        .await
        .map_err(|e| batchperf_error::runtime!("Tokio join error: {}", e))??;

        Ok(Self::new(conn))
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut mysql_lib::Conn) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|e| {
                batchperf_error::connection!("MysqlDriver lock error: {}", e)
            })?;
            let conn = guard
                .as_mut()
                .ok_or_else(|| batchperf_error::connection!("Mysql connection is closed"))?;

            f(conn)
        })
        .await
        .map_err(|e| batchperf_error::runtime!("Tokio join error: {}", e))?
    }
}

#[async_trait::async_trait]
impl Driver for MysqlDriver {
    async fn execute_batch(&self, statements: Vec<String>) -> Result<()> {
        self.with_conn(move |conn| {
            log::trace!("Execute batch of {} statements", statements.len());
            let mut result = conn
                .query_iter(statements.join(";\n"))
                .map_err(|e| batchperf_error::database!("Execute batch error: {}", e))?;

            // Each statement yields its own result set, errors surface while draining
            while let Some(set) = result.iter() {
                for row in set {
                    row.map_err(|e| batchperf_error::database!("Execute batch error: {}", e))?;
                }
            }

            Ok(())
        })
        .await
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        let sql_string = sql.to_string();
        self.with_conn(move |conn| {
            log::trace!("Execute `{}`", sql_string);
            conn.query_drop(&sql_string).map_err(|e| {
                batchperf_error::database!("Execute error: {}, sql: `{}`", e, sql_string)
            })?;

            Ok(conn.affected_rows())
        })
        .await
    }

    async fn query_u64(&self, sql: &str) -> Result<u64> {
        let sql_string = sql.to_string();
        self.with_conn(move |conn| {
            log::trace!("Query `{}`", sql_string);
            conn.query_first::<u64, _>(&sql_string)
                .map_err(|e| {
                    batchperf_error::database!("Query error: {}, sql: `{}`", e, sql_string)
                })?
                .ok_or_else(|| batchperf_error::database!("Query `{}` returned no rows", sql_string))
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| batchperf_error::connection!("MysqlDriver lock error: {}", e))?;

        // Dropping the Conn shuts the socket down
        if guard.take().is_some() {
            log::debug!("Close mysql connection");
        }

        Ok(())
    }
}

use std::{fmt, str::FromStr};

use batchperf_error::Result;

/// # Database driver identifier
///
/// ```
/// use batchperf_conn::DriverKind;
///
/// assert_eq!("sqlite".parse::<DriverKind>().unwrap(), DriverKind::Sqlite);
/// assert_eq!("MySQL".parse::<DriverKind>().unwrap(), DriverKind::Mysql);
/// assert!("oracle".parse::<DriverKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    Sqlite,
    Mysql,
}

impl DriverKind {
    /// Url prefix accepted by the driver
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite://",
            Self::Mysql => "mysql://",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DriverKind {
    type Err = batchperf_error::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "mysql" => Ok(Self::Mysql),
            _ => Err(batchperf_error::argument!("Unknown driver `{}`", s)),
        }
    }
}

/// Everything needed to open a [`Connection`](crate::Connection)
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub url: String,
    pub driver: DriverKind,
    pub username: String,
    pub password: String,
}

impl ConnectOptions {
    pub fn new(driver: DriverKind, url: &str) -> Self {
        Self {
            url: url.into(),
            driver,
            username: String::new(),
            password: String::new(),
        }
    }

    /// In-memory sqlite database
    pub fn sqlite_memory() -> Self {
        Self::new(DriverKind::Sqlite, "sqlite://memory")
    }

    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.username = username.trim().into();
        self.password = password.trim().into();
        self
    }

    /// Url with the driver scheme stripped, e.g. `memory` for `sqlite://memory`
    pub fn location(&self) -> Result<&str> {
        self.url.strip_prefix(self.driver.scheme()).ok_or_else(|| {
            batchperf_error::connection!(
                "Url `{}` does not match driver `{}`",
                self.url,
                self.driver
            )
        })
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("url", &self.url)
            .field("driver", &self.driver)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_location() {
        assert_eq!(
            ConnectOptions::sqlite_memory().location().unwrap(),
            "memory"
        );
        assert_eq!(
            ConnectOptions::new(DriverKind::Sqlite, "sqlite:///tmp/db.sqlite")
                .location()
                .unwrap(),
            "/tmp/db.sqlite"
        );

        let err = ConnectOptions::new(DriverKind::Mysql, "sqlite://memory")
            .location()
            .unwrap_err();
        assert!(err.is_connection());
    }

    #[test]
    fn test_credentials() {
        let opts = ConnectOptions::new(DriverKind::Mysql, "mysql://127.0.0.1/perf")
            .credentials(" root ", "secret\n");
        assert_eq!(opts.username, "root");
        assert_eq!(opts.password, "secret");

        let debug = format!("{:?}", opts);
        assert!(!debug.contains("secret"));
    }
}

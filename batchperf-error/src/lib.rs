pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Connection: `{0}`")]
    Connection(String),
    #[error("Database: `{0}`")]
    Database(String),
    #[error("Runtime: `{0}`")]
    Runtime(String),
    #[error("Argument: `{0}`")]
    Argument(String),
    #[error("Batched: `{0}`")]
    Batched(String),
    #[error("Unbatched: `{0}`")]
    Unbatched(String),
}

impl Error {
    /// Opening, locking or closing the session failed, or it is not open
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

#[macro_export]
macro_rules! connection {
    ($($arg:tt)*) => { $crate::Error::Connection(format!($($arg)*)) };
}

#[macro_export]
macro_rules! database {
    ($($arg:tt)*) => { $crate::Error::Database(format!($($arg)*)) };
}

#[macro_export]
macro_rules! runtime {
    ($($arg:tt)*) => { $crate::Error::Runtime(format!($($arg)*)) };
}

#[macro_export]
macro_rules! argument {
    ($($arg:tt)*) => { $crate::Error::Argument(format!($($arg)*)) };
}

#[macro_export]
macro_rules! batched {
    ($($arg:tt)*) => { $crate::Error::Batched(format!($($arg)*)) };
}

#[macro_export]
macro_rules! unbatched {
    ($($arg:tt)*) => { $crate::Error::Unbatched(format!($($arg)*)) };
}

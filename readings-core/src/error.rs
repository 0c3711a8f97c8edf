//! Storage errors raised by repository implementations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to establish or use a database connection.
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query execution error: {0}")]
    Query(String),

    /// Begin/commit failed, so durability of the write was not confirmed.
    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                StorageError::Connection(e.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StorageError::Serialization(e.to_string())
            }
            other => StorageError::Query(other.to_string()),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

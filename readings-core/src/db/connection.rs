//! Explicit PostgreSQL connection handle.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::{StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>, max_connections: u32) -> Self {
        Self {
            url: url.into(),
            max_connections,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Lazily-connected pool handle, passed to whatever needs the database.
///
/// `connect` is idempotent and hands back the existing pool; `disconnect` is a
/// no-op once the handle is already disconnected.
pub struct Database {
    config: DatabaseConfig,
    pool: Mutex<Option<PgPool>>,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: Mutex::new(None),
        }
    }

    #[instrument(skip_all)]
    pub async fn connect(&self) -> StorageResult<PgPool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref().filter(|p| !p.is_closed()) {
            return Ok(pool.clone());
        }

        debug!(max_conn = self.config.max_connections, "creating connection pool");
        let pool = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(self.config.acquire_timeout)
            .connect(&self.config.url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        *guard = Some(pool.clone());
        Ok(pool)
    }

    #[instrument(skip_all)]
    pub async fn disconnect(&self) {
        if let Some(pool) = self.pool.lock().await.take() {
            pool.close().await;
            debug!("connection pool closed");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.pool
            .lock()
            .await
            .as_ref()
            .is_some_and(|p| !p.is_closed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable() -> DatabaseConfig {
        DatabaseConfig {
            url: "postgres://readings@127.0.0.1:1/readings".to_string(),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn disconnect_without_connect_is_a_no_op() {
        let db = Database::new(unreachable());
        db.disconnect().await;
        db.disconnect().await;
        assert!(!db.is_connected().await);
    }

    #[tokio::test]
    async fn failed_connect_leaves_handle_disconnected() {
        let db = Database::new(unreachable());
        let err = db.connect().await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
        assert!(!db.is_connected().await);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn connect_is_idempotent() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let db = Database::new(DatabaseConfig::new(url, 2));
        let first = db.connect().await.unwrap();
        let second = db.connect().await.unwrap();
        assert_eq!(first.size(), second.size());
        assert!(db.is_connected().await);

        db.disconnect().await;
        assert!(first.is_closed());
        db.disconnect().await;
        assert!(!db.is_connected().await);
    }
}

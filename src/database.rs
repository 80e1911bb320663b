use async_trait::async_trait;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use teloxide::types::ChatId;
use tokio::sync::Semaphore;
use tokio::time::{Duration, timeout};

use crate::broadcast::{DirectoryError, Recipient, RecipientDirectory};

const QUERY_TIMEOUT: Duration = Duration::from_secs(10);
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("database call timed out after {0:?}")]
    Timeout(Duration),
    #[error("database task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    pub telegram_id: i64,
    pub language: String,
    pub created_at: String,
}

pub fn init_database(path: &Path) -> Result<(), DatabaseError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS customer (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            telegram_id INTEGER NOT NULL UNIQUE,
            language TEXT NOT NULL DEFAULT 'en',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );",
    )?;
    Ok(())
}

/// Bounds how many SQLite connections are open at once. Each call runs on the
/// blocking pool with its own connection.
pub struct DatabasePool {
    path: PathBuf,
    permits: Arc<Semaphore>,
    query_timeout: Duration,
}

impl DatabasePool {
    pub fn new(path: impl Into<PathBuf>, max_connections: usize) -> Self {
        Self {
            path: path.into(),
            permits: Arc::new(Semaphore::new(max_connections.max(1))),
            query_timeout: QUERY_TIMEOUT,
        }
    }

    pub async fn execute_with_timeout<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| DatabaseError::Task(e.to_string()))?;

        let path = self.path.clone();
        let task = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            f(&conn)
        });

        match timeout(self.query_timeout, task).await {
            Ok(Ok(result)) => Ok(result?),
            Ok(Err(join_err)) => Err(DatabaseError::Task(join_err.to_string())),
            Err(_) => Err(DatabaseError::Timeout(self.query_timeout)),
        }
    }

    /// Adds a new customer, or refreshes the language of a known one.
    pub async fn register_customer(&self, telegram_id: i64, language: &str) -> Result<(), DatabaseError> {
        let language = language.to_string();
        self.execute_with_timeout(move |conn| {
            conn.execute(
                "INSERT INTO customer (telegram_id, language) VALUES (?1, ?2)
                 ON CONFLICT(telegram_id) DO UPDATE SET language = excluded.language",
                params![telegram_id, language],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn find_all_customers(&self) -> Result<Vec<Customer>, DatabaseError> {
        self.execute_with_timeout(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, telegram_id, language, created_at FROM customer ORDER BY id",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(Customer {
                    id: row.get(0)?,
                    telegram_id: row.get(1)?,
                    language: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?;
            rows.collect()
        })
        .await
    }
}

#[async_trait]
impl RecipientDirectory for DatabasePool {
    async fn fetch_all_recipients(&self) -> Result<Vec<Recipient>, DirectoryError> {
        let customers = self
            .find_all_customers()
            .await
            .map_err(|e| DirectoryError(e.to_string()))?;

        Ok(customers
            .into_iter()
            .map(|c| Recipient { target: ChatId(c.telegram_id) })
            .collect())
    }
}

pub mod draw_store;
pub mod ticket_store;
pub mod user_store;

pub use draw_store::DrawStore;
pub use ticket_store::TicketStore;
pub use user_store::UserStore;

use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;

/// Single SQLite connection shared by every store.
///
/// Stores borrow a `&Connection`, so the same store code runs against the
/// locked connection or against an open `rusqlite::Transaction`. Holding the
/// lock for the duration of a transaction serializes writers.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub async fn new(db_path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS draws (
                id TEXT PRIMARY KEY,
                numbers TEXT NOT NULL,
                bonus_number INTEGER CHECK (bonus_number BETWEEN 1 AND 45),
                drawn_at INTEGER NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            )",
            [],
        )?;

        // At most one active draw, enforced by the database itself
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS draws_single_active
             ON draws (is_active) WHERE is_active = 1",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                numbers TEXT NOT NULL,
                is_auto INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                winning_grade INTEGER NOT NULL DEFAULT 0
                    CHECK (winning_grade BETWEEN 0 AND 5),
                draw_id TEXT,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (draw_id) REFERENCES draws(id) ON DELETE SET NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS tickets_by_user ON tickets (user_id)",
            [],
        )?;

        Ok(())
    }

    pub async fn get_connection(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}

pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Current time at the precision the database keeps.
pub(crate) fn now() -> DateTime<Utc> {
    from_millis(to_millis(Utc::now()))
}

pub(crate) fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

/// Maps a column that failed domain validation onto a rusqlite error so it
/// can be raised from inside a row closure.
pub(crate) fn invalid_column(
    index: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        Box::new(err),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("lotto.db");

        let storage = Storage::new(&path).await.unwrap();
        drop(storage);

        // reopening runs the schema again against existing tables
        let storage = Storage::new(&path).await.unwrap();
        let conn = storage.get_connection().await;
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('users', 'draws', 'tickets')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }

    #[tokio::test]
    async fn test_unusable_parent_directory() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let result = Storage::new(&blocker.join("lotto.db")).await;
        assert!(matches!(result, Err(crate::error::LottoError::Io(_))));
    }
}

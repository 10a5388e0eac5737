//! SQLite-backed default store (TDM-37).
//!
//! One `EngineDb` wraps one connection; the host service opens a
//! connection per worker and points them at the same file. WAL mode plus a
//! busy timeout make the counter upserts queue behind each other instead of
//! returning SQLITE_BUSY, which keeps the allocator's increments lossless
//! under concurrency.

use std::path::PathBuf;

use rusqlite::Connection;

pub mod types;
pub use types::*;

mod arms;
mod candidates;
mod ratings;

pub struct EngineDb {
    conn: Connection,
}

impl EngineDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Open (or create) a database at `path` and apply pending migrations.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout = 5000;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        Ok(Self { conn })
    }

    /// Open an in-memory database with the full schema applied.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;
        Ok(Self { conn })
    }
}

// =============================================================================
// Shared test utilities
// =============================================================================


// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::test_utils::test_db;
    use super::*;

    #[test]
    fn test_open_creates_tables() {
        let db = test_db();
        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM rating_events", [], |row| row.get(0))
            .expect("rating_events table should exist");
        assert_eq!(count, 0);

        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM candidates", [], |row| row.get(0))
            .expect("candidates table should exist");
        assert_eq!(count, 0);

        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM allocation_arms", [], |row| row.get(0))
            .expect("allocation_arms table should exist");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_idempotent_schema_application() {
        // Opening the same DB twice should not error (IF NOT EXISTS)
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("idempotent.db");

        let _db1 = EngineDb::open_at(path.clone()).expect("first open");
        let _db2 = EngineDb::open_at(path).expect("second open should not fail");
    }

    #[test]
    fn test_open_in_memory() {
        let db = EngineDb::open_in_memory().expect("in-memory open");
        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM candidates", [], |row| row.get(0))
            .expect("schema applied");
        assert_eq!(count, 0);
    }
}

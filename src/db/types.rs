//! Shared type definitions for the database layer.

use thiserror::Error;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to encode column value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

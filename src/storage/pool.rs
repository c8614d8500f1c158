//! Database connection setup.
//!
//! The survey writes through a single SQLite connection:
//! - WAL mode enabled so readers are not blocked by the writer
//! - Automatic database file creation

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{ConnectOptions, SqliteConnection};

use crate::error_handling::DatabaseError;

/// Opens (creating if needed) the database at `db_path` with WAL enabled.
pub async fn open_connection(db_path: &Path) -> Result<SqliteConnection, DatabaseError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created successfully."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Database file already exists.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }

    SqliteConnectOptions::from_str(&format!("sqlite:{db_path_str}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .connect()
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            DatabaseError::SqlError(e)
        })
}

/// Opens an existing database; a missing file is an error.
///
/// Used to read earlier survey snapshots.
pub async fn open_existing(db_path: &Path) -> Result<SqliteConnection, DatabaseError> {
    SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(false)
        .connect()
        .await
        .map_err(|e| {
            error!("Failed to open {}: {e}", db_path.display());
            DatabaseError::SqlError(e)
        })
}

//! Outcome table creation.
//!
//! The table name is interpolated into SQL, so callers must pass a name that
//! passed [`crate::config::is_valid_table_name`].

use sqlx::SqliteConnection;

use crate::error_handling::DatabaseError;

/// Creates the outcome table and its all-column unique index if missing.
pub async fn create_outcome_table(
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<(), DatabaseError> {
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            zone TEXT,
            year INTEGER,
            month INTEGER,
            day INTEGER,
            timestamp INTEGER,
            name TEXT,
            port INTEGER,
            valid_info TEXT,
            cert_usage INTEGER,
            selector INTEGER,
            mtype INTEGER,
            cert_info TEXT
        )"
    ))
    .execute(&mut *conn)
    .await?;

    sqlx::query(&format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {table}_uniq ON {table} (
            zone, year, month, day, timestamp, name, port,
            valid_info, cert_usage, selector, mtype, cert_info
        )"
    ))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

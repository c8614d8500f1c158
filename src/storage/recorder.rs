//! Concurrency-safe, deduplicated outcome persistence.

use std::path::Path;

use log::{debug, error, warn};
use sqlx::{Connection, Row, SqliteConnection};
use tokio::sync::Mutex;

use crate::dane::{TlsaResource, ValidationOutcome};
use crate::error_handling::DatabaseError;
use crate::storage::{create_outcome_table, open_connection, OutcomeRecord, ProbeRound};

/// What happened to one insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertStatus {
    Inserted,
    /// An identical row already existed; the insert was rolled back.
    Duplicate,
}

/// Rows written for one endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndpointRows {
    pub inserted: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// Writes outcome rows through one shared connection.
///
/// All workers share a single connection; the mutex is held across
/// begin, insert and commit so writes never interleave.
pub struct OutcomeRecorder {
    conn: Mutex<SqliteConnection>,
    table: String,
}

impl OutcomeRecorder {
    /// Opens the database file at `db_path` and prepares `table`.
    pub async fn open(db_path: &Path, table: &str) -> Result<Self, DatabaseError> {
        let conn = open_connection(db_path).await?;
        Self::new(conn, table).await
    }

    /// Wraps an open connection, creating `table` if it does not exist.
    pub async fn new(mut conn: SqliteConnection, table: &str) -> Result<Self, DatabaseError> {
        create_outcome_table(&mut conn, table).await?;
        Ok(OutcomeRecorder {
            conn: Mutex::new(conn),
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Inserts one row in its own transaction.
    ///
    /// A unique-index violation is not an error: the transaction is rolled
    /// back and [`InsertStatus::Duplicate`] returned.
    pub async fn record(&self, row: &OutcomeRecord) -> Result<InsertStatus, DatabaseError> {
        let mut conn = self.conn.lock().await;
        let mut tx = conn.begin().await?;

        let result = sqlx::query(&format!(
            "INSERT INTO {} (
                zone, year, month, day, timestamp, name, port,
                valid_info, cert_usage, selector, mtype, cert_info
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.table
        ))
        .bind(&row.zone)
        .bind(row.year)
        .bind(i64::from(row.month))
        .bind(i64::from(row.day))
        .bind(row.timestamp)
        .bind(&row.name)
        .bind(i64::from(row.port))
        .bind(row.valid_info.as_str())
        .bind(i64::from(row.cert_usage))
        .bind(i64::from(row.selector))
        .bind(i64::from(row.mtype))
        .bind(&row.cert_info)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {
                tx.commit().await?;
                Ok(InsertStatus::Inserted)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tx.rollback().await?;
                debug!("Duplicate row for {}:[{}], skipped", row.name, row.port);
                Ok(InsertStatus::Duplicate)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed: {rollback_err}");
                }
                Err(DatabaseError::SqlError(e))
            }
        }
    }

    /// Writes one row per TLSA record of an endpoint, all with `outcome`.
    ///
    /// Insert failures are logged and counted, never returned.
    pub async fn record_endpoint(
        &self,
        round: &ProbeRound,
        name: &str,
        port: u16,
        outcome: ValidationOutcome,
        records: &[TlsaResource],
    ) -> EndpointRows {
        let mut rows = EndpointRows::default();
        for record in records {
            let row = OutcomeRecord::for_tlsa(round, name, port, outcome, record);
            match self.record(&row).await {
                Ok(InsertStatus::Inserted) => rows.inserted += 1,
                Ok(InsertStatus::Duplicate) => rows.duplicates += 1,
                Err(e) => {
                    error!("Failed to record {name}:[{port}] ({outcome}): {e}");
                    rows.failed += 1;
                }
            }
        }
        rows
    }

    /// Number of rows in the table.
    pub async fn row_count(&self) -> Result<i64, DatabaseError> {
        let mut conn = self.conn.lock().await;
        let count: i64 = sqlx::query(&format!("SELECT COUNT(*) FROM {}", self.table))
            .fetch_one(&mut *conn)
            .await?
            .get(0);
        Ok(count)
    }

    /// Folds the WAL back into the main database file.
    pub async fn checkpoint(&self) {
        let mut conn = self.conn.lock().await;
        if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&mut *conn)
            .await
        {
            warn!("Failed to checkpoint WAL: {e}");
        }
    }
}

//! Shared test helpers for storage module tests.

use chrono::NaiveDate;
use sqlx::{Connection, SqliteConnection};

use crate::storage::{OutcomeRecorder, ProbeRound};

/// Recorder over an in-memory database with the default table.
pub async fn create_test_recorder() -> OutcomeRecorder {
    let conn = SqliteConnection::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    OutcomeRecorder::new(conn, crate::config::DEFAULT_TABLE_NAME)
        .await
        .expect("Failed to create outcome table")
}

/// Round fixed at 2014-08-01 00:00:00 UTC.
pub fn test_round() -> ProbeRound {
    ProbeRound::new(
        1_406_851_200,
        NaiveDate::from_ymd_opt(2014, 8, 1).expect("valid date"),
    )
}

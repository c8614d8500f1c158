//! Reading endpoints back out of an earlier survey database.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use sqlx::Row;

use crate::error_handling::DatabaseError;
use crate::storage::open_existing;

/// Distinct `(name, port)` pairs recorded on `date` in `table` of `db_path`.
pub async fn load_snapshot_endpoints(
    db_path: &Path,
    table: &str,
    date: NaiveDate,
) -> Result<Vec<(String, u16)>, DatabaseError> {
    let mut conn = open_existing(db_path).await?;
    let rows = sqlx::query(&format!(
        "SELECT DISTINCT name, port FROM {table}
         WHERE year = ? AND month = ? AND day = ?
         ORDER BY name, port"
    ))
    .bind(date.year())
    .bind(i64::from(date.month()))
    .bind(i64::from(date.day()))
    .fetch_all(&mut conn)
    .await?;

    let mut endpoints = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.try_get("name")?;
        let port: i64 = row.try_get("port")?;
        match u16::try_from(port) {
            Ok(port) => endpoints.push((name, port)),
            Err(_) => log::warn!("Skipping {name} with out-of-range port {port}"),
        }
    }
    Ok(endpoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dane::{TlsaResource, ValidationOutcome};
    use crate::storage::{OutcomeRecorder, ProbeRound};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_snapshot_endpoints_filters_by_date() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("stats.2014-08-01.host.db");
        let recorder = OutcomeRecorder::open(&path, "tlsa_rdata").await.expect("open");

        let day = NaiveDate::from_ymd_opt(2014, 8, 1).expect("date");
        let next_day = NaiveDate::from_ymd_opt(2014, 8, 2).expect("date");
        let records = [
            TlsaResource::new(3, 1, 1, vec![0x01]),
            TlsaResource::new(3, 0, 1, vec![0x02]),
        ];
        for (round, name, port) in [
            (ProbeRound::new(1, day), "example.com", 443),
            (ProbeRound::new(2, day), "example.com", 443),
            (ProbeRound::new(1, day), "mx.example.com", 25),
            (ProbeRound::new(3, next_day), "other.net", 443),
        ] {
            recorder
                .record_endpoint(&round, name, port, ValidationOutcome::Ok, &records)
                .await;
        }
        recorder.checkpoint().await;
        drop(recorder);

        let mut endpoints = load_snapshot_endpoints(&path, "tlsa_rdata", day)
            .await
            .expect("load");
        endpoints.sort();
        assert_eq!(
            endpoints,
            vec![
                ("example.com".to_string(), 443),
                ("mx.example.com".to_string(), 25)
            ]
        );
    }
}

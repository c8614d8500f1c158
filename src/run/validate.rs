//! Validate-only mode: re-probe the endpoints of an earlier snapshot.
//!
//! A snapshot is a survey database named `PREFIX.YYYY-MM-DD.REST`, for example
//! `stats.2014-08-01.host.db`. The `(name, port)` pairs recorded on that date
//! are probed again, one at a time, and recorded under the current round.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{error, info, warn};

use crate::app::print_survey_statistics;
use crate::cert::{CertificateFetcher, ExternalFetcher};
use crate::config::Config;
use crate::discovery::{probe_endpoint, SurveyContext};
use crate::dns::DnsLookup;
use crate::error_handling::ConfigError;
use crate::initialization::init_resolver;
use crate::run::SurveyReport;
use crate::storage::{load_snapshot_endpoints, OutcomeRecorder, ProbeRound};

/// Worker id used in log lines of the sequential validation loop.
const VALIDATION_WORKER_ID: usize = 1;

/// Extracts the date from a snapshot file name.
///
/// # Errors
///
/// Returns `ConfigError::InvalidSnapshotName` unless the second dot-separated
/// component of the file name is a `YYYY-MM-DD` date.
pub fn parse_snapshot_date(path: &Path) -> Result<NaiveDate, ConfigError> {
    let invalid = || ConfigError::InvalidSnapshotName(path.to_path_buf());
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(invalid)?;
    let date = file_name.split('.').nth(1).ok_or_else(invalid)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())
}

/// Re-validates a snapshot with the real resolver and certificate program.
///
/// # Errors
///
/// Fails if the snapshot name has no date, the snapshot cannot be read, or the
/// output database cannot be opened.
pub async fn run_validation(config: Config) -> Result<SurveyReport> {
    let dns = init_resolver(config.nameserver).context("Failed to initialize DNS resolver")?;
    let fetcher = Arc::new(ExternalFetcher::new(&config.cert_program));
    run_validation_with(config, dns, fetcher).await
}

/// Like [`run_validation`] with the DNS client and certificate fetcher supplied.
///
/// # Errors
///
/// Fails before reading the snapshot if `config` has no workers or an
/// unusable table name.
pub async fn run_validation_with(
    config: Config,
    dns: Arc<dyn DnsLookup>,
    fetcher: Arc<dyn CertificateFetcher>,
) -> Result<SurveyReport> {
    config.validate_run_limits()?;
    let date = parse_snapshot_date(&config.input)?;
    let endpoints = load_snapshot_endpoints(&config.input, &config.table, date)
        .await
        .with_context(|| format!("Failed to read snapshot {}", config.input.display()))?;

    let recorder = OutcomeRecorder::open(&config.db_path, &config.table)
        .await
        .context("Failed to initialize outcome database")?;
    let recorder = Arc::new(recorder);
    let ctx = SurveyContext::new(dns, fetcher, Arc::clone(&recorder), ProbeRound::now());

    info!("start @ {}", chrono::Local::now());
    warn!("only validation!");
    let start_time = Instant::now();

    let mut have_tlsa = 0usize;
    for (name, port) in &endpoints {
        if probe_endpoint(&ctx, name, *port, VALIDATION_WORKER_ID)
            .await
            .is_some()
        {
            have_tlsa += 1;
        }
    }
    if endpoints.len() != have_tlsa {
        error!(
            "done_rows[{}] != have_tlsa[{}] for {}",
            endpoints.len(),
            have_tlsa,
            config.input.display()
        );
    }

    recorder.checkpoint().await;
    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    print_survey_statistics(&ctx.stats, elapsed_seconds);
    info!("end @ {}", chrono::Local::now());

    let rows_total = recorder
        .row_count()
        .await
        .context("Failed to count outcome rows")?;
    Ok(SurveyReport::from_stats(
        &ctx.stats,
        config.db_path.clone(),
        rows_total,
        elapsed_seconds,
    ))
}

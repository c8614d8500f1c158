//! The survey entry point: feed the queue, let the workers drain it.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;

use crate::app::{log_progress, print_survey_statistics, shutdown_gracefully};
use crate::cert::{CertificateFetcher, ExternalFetcher};
use crate::config::{Config, LOGGING_INTERVAL};
use crate::discovery::SurveyContext;
use crate::dns::DnsLookup;
use crate::initialization::init_resolver;
use crate::run::{SurveyReport, TaskQueue, WorkerPool};
use crate::storage::{OutcomeRecorder, ProbeRound};

/// Runs a survey with the real resolver and the external certificate program.
///
/// Reads domains from `config.input` (`-` for stdin), surveys each one with
/// `config.threads` workers and stores outcome rows in `config.db_path`.
///
/// # Errors
///
/// Fails if the resolver, the database or the input cannot be set up. Nothing
/// that happens while probing individual endpoints is an error.
pub async fn run_survey(config: Config) -> Result<SurveyReport> {
    let dns = init_resolver(config.nameserver).context("Failed to initialize DNS resolver")?;
    let fetcher = Arc::new(ExternalFetcher::new(&config.cert_program));
    run_survey_with(config, dns, fetcher).await
}

/// Like [`run_survey`] with the DNS client and certificate fetcher supplied.
///
/// # Errors
///
/// Fails without touching the database if `config` has no workers or an
/// unusable table name.
pub async fn run_survey_with(
    config: Config,
    dns: Arc<dyn DnsLookup>,
    fetcher: Arc<dyn CertificateFetcher>,
) -> Result<SurveyReport> {
    config.validate_run_limits()?;
    let recorder = OutcomeRecorder::open(&config.db_path, &config.table)
        .await
        .context("Failed to initialize outcome database")?;
    let recorder = Arc::new(recorder);

    let round = ProbeRound::now();
    let ctx = SurveyContext::new(dns, fetcher, Arc::clone(&recorder), round);
    let stats = Arc::clone(&ctx.stats);

    info!("start @ {}", chrono::Local::now());
    let start_time = Instant::now();

    let queue = Arc::new(TaskQueue::new());
    let workers = WorkerPool::start(config.threads, Arc::clone(&queue), ctx);
    info!("Started {} workers", workers.len());

    let (stop_logging, mut stop_signal) = oneshot::channel();
    let logging_task = {
        let stats = Arc::clone(&stats);
        let queue = Arc::clone(&queue);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(LOGGING_INTERVAL));
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => log_progress(start_time, &stats, &queue),
                    _ = &mut stop_signal => break,
                }
            }
        })
    };

    let enqueued = if config.reads_stdin() {
        info!("Reading domains from stdin");
        enqueue_lines(BufReader::new(tokio::io::stdin()), &queue).await
    } else {
        let file = tokio::fs::File::open(&config.input)
            .await
            .with_context(|| format!("Failed to open input file {}", config.input.display()))?;
        enqueue_lines(BufReader::new(file), &queue).await
    };
    info!("Enqueued {enqueued} domains");

    queue.join().await;
    drop(workers);

    shutdown_gracefully(stop_logging, logging_task).await;
    log_progress(start_time, &stats, &queue);

    recorder.checkpoint().await;
    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    print_survey_statistics(&stats, elapsed_seconds);
    info!("end @ {}", chrono::Local::now());

    let rows_total = recorder
        .row_count()
        .await
        .context("Failed to count outcome rows")?;
    Ok(SurveyReport::from_stats(
        &stats,
        config.db_path.clone(),
        rows_total,
        elapsed_seconds,
    ))
}

/// Puts every domain line of `reader` on `queue` and returns how many.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
/// Bytes that are not UTF-8 are replaced rather than ending the input.
pub async fn enqueue_lines<R>(mut reader: R, queue: &TaskQueue) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read line from input: {e}");
                break;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        log::debug!("[main]: {trimmed}");
        queue.put(trimmed);
        count += 1;
    }
    count
}

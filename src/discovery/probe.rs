//! Probing endpoints: TLSA lookup, validation and recording.

use std::sync::Arc;

use log::{debug, info};

use crate::cert::CertificateFetcher;
use crate::dane::{validate_endpoint, ValidationOutcome};
use crate::discovery::{discover_endpoints, ServiceEndpoint};
use crate::dns::{strip_root_dot, tlsa_name, DnsLookup};
use crate::error_handling::{SurveyCounter, SurveyStats};
use crate::storage::{OutcomeRecorder, ProbeRound};

/// Everything a worker needs, built once per run and shared read-only.
#[derive(Clone)]
pub struct SurveyContext {
    pub dns: Arc<dyn DnsLookup>,
    pub fetcher: Arc<dyn CertificateFetcher>,
    pub recorder: Arc<OutcomeRecorder>,
    pub round: ProbeRound,
    pub stats: Arc<SurveyStats>,
}

impl SurveyContext {
    pub fn new(
        dns: Arc<dyn DnsLookup>,
        fetcher: Arc<dyn CertificateFetcher>,
        recorder: Arc<OutcomeRecorder>,
        round: ProbeRound,
    ) -> Self {
        SurveyContext {
            dns,
            fetcher,
            recorder,
            round,
            stats: Arc::new(SurveyStats::new()),
        }
    }
}

/// Looks up TLSA for `name:port` and, if any exist, validates and records them.
///
/// Returns `None` when there are no TLSA records: such endpoints get neither an
/// outcome nor rows.
pub async fn probe_endpoint(
    ctx: &SurveyContext,
    name: &str,
    port: u16,
    worker_id: usize,
) -> Option<ValidationOutcome> {
    let name = strip_root_dot(name);
    ctx.stats.increment(SurveyCounter::EndpointsProbed);

    let records = ctx.dns.lookup_tlsa(&tlsa_name(name, port)).await.into_records();
    if records.is_empty() {
        return None;
    }
    ctx.stats.increment(SurveyCounter::EndpointsWithTlsa);

    let validation = validate_endpoint(
        ctx.dns.as_ref(),
        ctx.fetcher.as_ref(),
        name,
        port,
        &records,
        worker_id,
    )
    .await;

    // Rows are written only once every record has been evaluated.
    let rows = ctx
        .recorder
        .record_endpoint(&ctx.round, name, port, validation.outcome, &records)
        .await;
    ctx.stats.record_rows(&rows);
    ctx.stats.record_outcome(validation.outcome);
    debug!(
        "[{worker_id}] {name}:[{port}] {} ({} rows, {} duplicates)",
        validation.outcome, rows.inserted, rows.duplicates
    );
    Some(validation.outcome)
}

/// Discovers and probes every endpoint of `domain`, in order.
///
/// Returns the endpoints that had TLSA records, with their outcomes.
pub async fn survey_domain(
    ctx: &SurveyContext,
    domain: &str,
    worker_id: usize,
) -> Vec<(ServiceEndpoint, ValidationOutcome)> {
    let qn = strip_root_dot(domain);
    info!("qn={qn}");

    let mut results = Vec::new();
    for endpoint in discover_endpoints(ctx.dns.as_ref(), qn).await {
        if let Some(outcome) = probe_endpoint(ctx, &endpoint.name, endpoint.port, worker_id).await {
            results.push((endpoint, outcome));
        }
    }

    ctx.stats.increment(SurveyCounter::DomainsCompleted);
    info!("[{worker_id}] DONE-ONE");
    results
}

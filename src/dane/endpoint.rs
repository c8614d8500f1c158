//! Validating one `(name, port)` endpoint end to end.

use log::{info, warn};

use crate::cert::CertificateFetcher;
use crate::dane::{
    derive_outcome, evaluate_record, EndpointCertificates, RecordEvaluation, TlsaResource,
    ValidationOutcome,
};
use crate::dns::DnsLookup;

/// Everything learned while validating an endpoint.
#[derive(Debug, Clone)]
pub struct EndpointValidation {
    pub outcome: ValidationOutcome,
    pub certificates: EndpointCertificates,
    /// One entry per TLSA record, in record order. Empty unless certificates
    /// were retrieved.
    pub evaluations: Vec<RecordEvaluation>,
}

/// Validates the TLSA records of `name:port` against what the server presents.
///
/// Without an A record no certificate is fetched. Otherwise the chain is
/// retrieved twice, once without SNI and once with `name` as SNI, and each
/// record is evaluated against both.
pub async fn validate_endpoint(
    dns: &dyn DnsLookup,
    fetcher: &dyn CertificateFetcher,
    name: &str,
    port: u16,
    records: &[TlsaResource],
    worker_id: usize,
) -> EndpointValidation {
    // IPv4 only; the fetcher connects by name.
    if dns.lookup_a(name).await.is_empty() {
        return EndpointValidation {
            outcome: ValidationOutcome::NoIp,
            certificates: EndpointCertificates::default(),
            evaluations: Vec::new(),
        };
    }

    let plain = fetcher.fetch(name, port, None).await;
    let sni = fetcher.fetch(name, port, Some(name)).await;
    let certificates = EndpointCertificates::new(sni, plain);

    if !certificates.any() {
        warn!("NO-CERT found, {name}:[{port}]");
        return EndpointValidation {
            outcome: ValidationOutcome::NoCert,
            certificates,
            evaluations: Vec::new(),
        };
    }
    info!(
        "[{worker_id}] {} cert found, {name}:[{port}]",
        certificates.presence()
    );

    let evaluations: Vec<RecordEvaluation> = records
        .iter()
        .map(|record| {
            let evaluation = evaluate_record(record, &certificates);
            log_evaluation(&evaluation, name, port, worker_id);
            evaluation
        })
        .collect();

    let outcome = derive_outcome(true, &certificates, &evaluations);
    EndpointValidation {
        outcome,
        certificates,
        evaluations,
    }
}

fn log_evaluation(evaluation: &RecordEvaluation, name: &str, port: u16, worker_id: usize) {
    if evaluation.matched() {
        info!(
            "[{worker_id}] {} cert matches! {name}:[{port}]",
            evaluation.matched_tags()
        );
        return;
    }
    if evaluation.bad_parameters {
        warn!("[{worker_id}] parameters are not valid, {name}:[{port}]");
    }
    info!("[{worker_id}] no cert matches, {name}:[{port}]");
    for (retrieval, mismatch) in &evaluation.mismatches {
        info!("# {}\n{mismatch}", retrieval.diagnostic_label());
    }
}

//! tlsa_survey library: DANE/TLSA adoption survey
//!
//! For every domain in an input list the survey derives the service endpoints
//! (web, mail exchanges and XMPP), looks up the TLSA records published for
//! each of them, retrieves the certificate chains the servers present and
//! records one validation outcome row per TLSA record in a SQLite database.
//!
//! # Example
//!
//! ```no_run
//! use tlsa_survey::{run_survey, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     input: std::path::PathBuf::from("zones.txt"),
//!     threads: 20,
//!     ..Default::default()
//! };
//!
//! let report = run_survey(config).await?;
//! println!(
//!     "Surveyed {} domains: {} endpoints with TLSA, {} rows",
//!     report.domains, report.endpoints_with_tlsa, report.rows_inserted
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Certificates are retrieved by an
//! external program (see [`ExternalFetcher`]); the DNS client and the fetcher
//! can be replaced through [`run_survey_with`] and [`run_validation_with`].

mod app;
mod cert;
pub mod config;
mod dane;
mod discovery;
mod dns;
mod error_handling;
pub mod initialization;
mod run;
mod storage;

// Re-export public API
pub use cert::{Certificate, CertificateChain, CertificateFetcher, ExternalFetcher, Retrieval};
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use dane::{
    derive_outcome, evaluate_chain, evaluate_record, normalize_hex, validate_endpoint, CertUsage,
    ChainVerdict, EndpointCertificates, EndpointValidation, MatchingType, Mismatch,
    RecordEvaluation, Selector, TlsaResource, ValidationOutcome,
};
pub use discovery::{
    discover_endpoints, probe_endpoint, survey_domain, EndpointOrigin, ServiceEndpoint,
    SurveyContext,
};
pub use dns::{tlsa_name, zone_of, DnsAnswer, DnsLookup, ResolverClient, SrvTarget};
pub use error_handling::{
    CertificateError, ConfigError, DatabaseError, InitializationError, SurveyCounter, SurveyStats,
};
pub use run::{
    enqueue_lines, parse_snapshot_date, run_survey, run_survey_with, run_validation,
    run_validation_with, SurveyReport, TaskQueue, WorkerPool,
};
pub use storage::{
    load_snapshot_endpoints, open_connection, EndpointRows, InsertStatus, OutcomeRecord,
    OutcomeRecorder, ProbeRound,
};

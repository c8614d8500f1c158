//! Error type definitions.
//!
//! Only configuration and initialization errors are fatal. Everything that goes
//! wrong while probing an endpoint is absorbed into the validation outcome.

use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error reading the system resolver configuration.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Invalid option combinations and missing files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("-s must have argument like 1.2.3.4:53, got `{0}`")]
    InvalidServer(String),

    #[error("input file {} does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("cert program {} does not exist, abort!", .0.display())]
    MissingCertProgram(PathBuf),

    #[error("invalid table name `{0}`: only letters, digits and '_' are allowed")]
    InvalidTableName(String),

    #[error("thread count must be at least 1")]
    InvalidThreadCount,

    #[error(
        "validation-only input {} must be a file named like $X.$YEAR-$MONTH-$DAY.$Y.$Z",
        .0.display()
    )]
    InvalidSnapshotName(PathBuf),
}

/// Failure to turn fetched PEM data into a certificate.
#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("PEM decoding error: {0}")]
    PemError(String),

    #[error("X.509 parsing error: {0}")]
    X509Error(String),
}

/// Survey progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum SurveyCounter {
    DomainsCompleted,
    EndpointsProbed,
    EndpointsWithTlsa,
    RowsInserted,
    RowsDuplicate,
    RowsFailed,
    /// Domain tasks whose processing panicked.
    TasksPanicked,
}

impl SurveyCounter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyCounter::DomainsCompleted => "Domains completed",
            SurveyCounter::EndpointsProbed => "Endpoints probed",
            SurveyCounter::EndpointsWithTlsa => "Endpoints with TLSA",
            SurveyCounter::RowsInserted => "Rows inserted",
            SurveyCounter::RowsDuplicate => "Duplicate rows",
            SurveyCounter::RowsFailed => "Failed inserts",
            SurveyCounter::TasksPanicked => "Panicked tasks",
        }
    }
}

//! Rows of the outcome table.

use chrono::{Datelike, Local, NaiveDate, Utc};

use crate::dane::{TlsaResource, ValidationOutcome};
use crate::dns::{strip_root_dot, zone_of};

/// Identifies one survey run.
///
/// Every row written during a run carries the same timestamp and date, fixed
/// when the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRound {
    /// UTC seconds since the epoch.
    pub timestamp: i64,
    /// Local calendar date.
    pub date: NaiveDate,
}

impl ProbeRound {
    pub fn new(timestamp: i64, date: NaiveDate) -> Self {
        ProbeRound { timestamp, date }
    }

    /// A round starting now.
    pub fn now() -> Self {
        ProbeRound {
            timestamp: Utc::now().timestamp(),
            date: Local::now().date_naive(),
        }
    }
}

/// One stored row: a TLSA record of an endpoint and the endpoint's outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub zone: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub timestamp: i64,
    pub name: String,
    pub port: u16,
    pub valid_info: ValidationOutcome,
    pub cert_usage: u8,
    pub selector: u8,
    pub mtype: u8,
    /// Certificate association data, lowercase hex.
    pub cert_info: String,
}

impl OutcomeRecord {
    /// Builds the row for `record` of endpoint `name:port`.
    pub fn for_tlsa(
        round: &ProbeRound,
        name: &str,
        port: u16,
        outcome: ValidationOutcome,
        record: &TlsaResource,
    ) -> Self {
        let name = strip_root_dot(name);
        OutcomeRecord {
            zone: zone_of(name).to_string(),
            year: round.date.year(),
            month: round.date.month(),
            day: round.date.day(),
            timestamp: round.timestamp,
            name: name.to_string(),
            port,
            valid_info: outcome,
            cert_usage: record.cert_usage,
            selector: record.selector,
            mtype: record.matching_type,
            cert_info: record.cert_data_hex(),
        }
    }
}

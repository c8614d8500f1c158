//! Summary returned by the entry points.

use std::collections::HashMap;
use std::path::PathBuf;

use strum::IntoEnumIterator;

use crate::dane::ValidationOutcome;
use crate::error_handling::{SurveyCounter, SurveyStats};

/// Results of a survey or validation run.
#[derive(Debug, Clone)]
pub struct SurveyReport {
    /// Domains fully processed, zero for validation runs
    pub domains: usize,
    /// Endpoints whose TLSA RRset was queried
    pub endpoints_probed: usize,
    /// Endpoints that had at least one TLSA record
    pub endpoints_with_tlsa: usize,
    /// Rows inserted during this run
    pub rows_inserted: usize,
    /// Rows skipped because an identical row existed
    pub duplicates: usize,
    /// Rows in the outcome table after the run
    pub rows_total: i64,
    /// Domain tasks that panicked and were skipped
    pub tasks_panicked: usize,
    /// Endpoint count per outcome
    pub outcomes: HashMap<ValidationOutcome, usize>,
    /// Path to the SQLite database containing results
    pub db_path: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

impl SurveyReport {
    pub(crate) fn from_stats(
        stats: &SurveyStats,
        db_path: PathBuf,
        rows_total: i64,
        elapsed_seconds: f64,
    ) -> Self {
        SurveyReport {
            domains: stats.count(SurveyCounter::DomainsCompleted),
            endpoints_probed: stats.count(SurveyCounter::EndpointsProbed),
            endpoints_with_tlsa: stats.count(SurveyCounter::EndpointsWithTlsa),
            rows_inserted: stats.count(SurveyCounter::RowsInserted),
            duplicates: stats.count(SurveyCounter::RowsDuplicate),
            rows_total,
            tasks_panicked: stats.count(SurveyCounter::TasksPanicked),
            outcomes: ValidationOutcome::iter()
                .map(|o| (o, stats.outcome_count(o)))
                .collect(),
            db_path,
            elapsed_seconds,
        }
    }

    /// Endpoints that ended with `outcome`.
    pub fn outcome(&self, outcome: ValidationOutcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }
}

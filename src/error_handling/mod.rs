//! Error handling and survey statistics.
//!
//! This module provides:
//! - Error type definitions for configuration, initialization, storage and
//!   certificate parsing
//! - Survey statistics tracking (outcome counts and progress counters)
//!
//! Only configuration and initialization errors stop a run. Per-endpoint
//! failures become validation outcomes and are counted here.

mod stats;
mod types;

// Re-export public API
pub use stats::SurveyStats;
pub use types::{
    CertificateError, ConfigError, DatabaseError, InitializationError, SurveyCounter,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dane::ValidationOutcome;
    use crate::storage::EndpointRows;
    use strum::IntoEnumIterator;

    #[test]
    fn test_survey_stats_initialization() {
        let stats = SurveyStats::new();
        for outcome in ValidationOutcome::iter() {
            assert_eq!(stats.outcome_count(outcome), 0);
        }
        for counter in SurveyCounter::iter() {
            assert_eq!(stats.count(counter), 0);
        }
    }

    #[test]
    fn test_survey_stats_outcomes() {
        let stats = SurveyStats::new();
        stats.record_outcome(ValidationOutcome::Ok);
        stats.record_outcome(ValidationOutcome::Ok);
        stats.record_outcome(ValidationOutcome::BadHash);
        assert_eq!(stats.outcome_count(ValidationOutcome::Ok), 2);
        assert_eq!(stats.outcome_count(ValidationOutcome::BadHash), 1);
        assert_eq!(stats.total_outcomes(), 3);
    }

    #[test]
    fn test_survey_stats_rows() {
        let stats = SurveyStats::new();
        stats.record_rows(&EndpointRows {
            inserted: 2,
            duplicates: 1,
            failed: 0,
        });
        stats.increment(SurveyCounter::DomainsCompleted);
        assert_eq!(stats.count(SurveyCounter::RowsInserted), 2);
        assert_eq!(stats.count(SurveyCounter::RowsDuplicate), 1);
        assert_eq!(stats.count(SurveyCounter::RowsFailed), 0);
        assert_eq!(stats.count(SurveyCounter::DomainsCompleted), 1);
    }
}

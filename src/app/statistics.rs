//! End-of-run statistics.

use log::info;
use strum::IntoEnumIterator;

use crate::dane::ValidationOutcome;
use crate::error_handling::{SurveyCounter, SurveyStats};

/// Logs every non-zero counter and outcome, then a one-line summary.
pub fn print_survey_statistics(stats: &SurveyStats, elapsed_seconds: f64) {
    info!("Survey Counts:");
    for counter in SurveyCounter::iter() {
        let count = stats.count(counter);
        if count > 0 {
            info!("   {}: {}", counter.as_str(), count);
        }
    }

    let total_outcomes = stats.total_outcomes();
    if total_outcomes > 0 {
        info!("Outcome Counts ({} endpoints):", total_outcomes);
        for outcome in ValidationOutcome::iter() {
            let count = stats.outcome_count(outcome);
            if count > 0 {
                info!("   {}: {}", outcome.as_str(), count);
            }
        }
    }

    print_simple_summary(
        stats.count(SurveyCounter::DomainsCompleted),
        stats.count(SurveyCounter::EndpointsWithTlsa),
        stats.outcome_count(ValidationOutcome::Ok),
        elapsed_seconds,
    );
}

fn print_simple_summary(domains: usize, with_tlsa: usize, ok: usize, elapsed_seconds: f64) {
    info!(
        "Surveyed {} domain{} ({} endpoints with TLSA, {} OK) in {:.1}s - see database for details",
        domains,
        if domains == 1 { "" } else { "s" },
        with_tlsa,
        ok,
        elapsed_seconds
    );
}

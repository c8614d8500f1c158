//! Progress logging utilities.

use log::info;

use crate::error_handling::{SurveyCounter, SurveyStats};
use crate::run::TaskQueue;

/// Logs how many domains are done, how many are still queued, and the rate.
pub fn log_progress(start_time: std::time::Instant, stats: &SurveyStats, queue: &TaskQueue) {
    let completed = stats.count(SurveyCounter::DomainsCompleted);
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Processed {} domains in {:.2} seconds (~{:.2} domains/sec), {} pending, {} endpoints with TLSA",
        completed,
        elapsed_secs,
        rate,
        queue.pending(),
        stats.count(SurveyCounter::EndpointsWithTlsa)
    );
}

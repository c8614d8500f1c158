//! Survey statistics tracking.
//!
//! This module provides thread-safe counters for validation outcomes and
//! survey progress, shared by all workers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::SurveyCounter;
use crate::dane::ValidationOutcome;
use crate::storage::EndpointRows;

/// Thread-safe survey statistics tracker.
///
/// Every outcome and counter is initialized to zero on creation. Share it
/// across tasks with `Arc`.
pub struct SurveyStats {
    outcomes: HashMap<ValidationOutcome, AtomicUsize>,
    counters: HashMap<SurveyCounter, AtomicUsize>,
}

impl SurveyStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in ValidationOutcome::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }

        let mut counters = HashMap::new();
        for counter in SurveyCounter::iter() {
            counters.insert(counter, AtomicUsize::new(0));
        }

        SurveyStats { outcomes, counters }
    }

    /// Counts one endpoint that ended with `outcome`.
    pub fn record_outcome(&self, outcome: ValidationOutcome) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment outcome counter for {:?} which is not in the map. \
                 This indicates a bug in SurveyStats initialization.",
                outcome
            );
        }
    }

    pub fn increment(&self, counter: SurveyCounter) {
        self.add(counter, 1);
    }

    pub fn add(&self, counter: SurveyCounter, n: usize) {
        if let Some(c) = self.counters.get(&counter) {
            c.fetch_add(n, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment counter {:?} which is not in the map. \
                 This indicates a bug in SurveyStats initialization.",
                counter
            );
        }
    }

    /// Adds the row counts of one recorded endpoint.
    pub fn record_rows(&self, rows: &EndpointRows) {
        self.add(SurveyCounter::RowsInserted, rows.inserted);
        self.add(SurveyCounter::RowsDuplicate, rows.duplicates);
        self.add(SurveyCounter::RowsFailed, rows.failed);
    }

    pub fn outcome_count(&self, outcome: ValidationOutcome) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn count(&self, counter: SurveyCounter) -> usize {
        self.counters
            .get(&counter)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Endpoints that reached an outcome, across all outcomes.
    pub fn total_outcomes(&self) -> usize {
        ValidationOutcome::iter()
            .map(|o| self.outcome_count(o))
            .sum()
    }
}

impl Default for SurveyStats {
    fn default() -> Self {
        Self::new()
    }
}

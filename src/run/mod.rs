//! Survey orchestration.
//!
//! A fixed pool of workers drains a shared FIFO of domain names. The producer
//! enqueues every input line and waits until each one is marked done.

mod queue;
mod report;
mod survey;
mod validate;
mod worker;

// Re-export public API
pub use queue::TaskQueue;
pub use report::SurveyReport;
pub use survey::{enqueue_lines, run_survey, run_survey_with};
pub use validate::{parse_snapshot_date, run_validation, run_validation_with};
pub use worker::WorkerPool;

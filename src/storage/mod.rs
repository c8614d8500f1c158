// storage/mod.rs
// Outcome database operations

mod models;
mod pool;
mod recorder;
mod schema;
mod snapshot;
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use models::{OutcomeRecord, ProbeRound};
pub use pool::{open_connection, open_existing};
pub use recorder::{EndpointRows, InsertStatus, OutcomeRecorder};
pub use schema::create_outcome_table;
pub use snapshot::load_snapshot_endpoints;

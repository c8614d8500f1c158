//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, ports, defaults)
//! - CLI option types and parsing
//! - The validated library `Config`

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{is_valid_table_name, parse_server, Config, LogFormat, LogLevel, Opt};

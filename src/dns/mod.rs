//! DNS resolution and record querying.
//!
//! This module provides async DNS operations using `trust-dns-resolver`:
//! - Address queries (A records) to decide whether an endpoint is reachable
//! - Mail exchanger queries (MX records)
//! - Service location queries (SRV records) for XMPP
//! - TLSA queries at `_PORT._tcp.NAME`
//!
//! Failures never surface as errors; see [`DnsAnswer`].

mod answer;
mod names;
mod records;

// Re-export public API
pub use answer::{DnsAnswer, SrvTarget};
pub use names::{strip_root_dot, tlsa_name, zone_of};
pub use records::{DnsLookup, ResolverClient};

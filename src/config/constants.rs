//! Configuration constants.
//!
//! This module defines the constants used throughout the survey, including
//! DNS timeouts, probed service ports and CLI defaults.

use std::time::Duration;

// constants (used as defaults)
/// Number of worker tasks draining the domain queue
pub const DEFAULT_THREADS: usize = 10;
/// Seconds between progress log lines while a survey runs
pub const LOGGING_INTERVAL: u64 = 5;
pub const DB_PATH: &str = "./stats.db";
pub const CERT_PROGRAM_PATH: &str = "./get_serv_cert.sh";
/// Input path that selects standard input
pub const STDIN_INPUT: &str = "-";
pub const DEFAULT_TABLE_NAME: &str = "tlsa_rdata";

// DNS query limits
/// Per-query timeout. One attempt only, no retries.
pub const DNS_TIMEOUT: Duration = Duration::from_secs(5);
/// Overall lifetime of a single lookup, including resolver bookkeeping
pub const DNS_LIFETIME: Duration = Duration::from_secs(10);
pub const DNS_ATTEMPTS: usize = 1;

// Probed services
pub const HTTPS_PORT: u16 = 443;
/// SMTP, submission and SMTPS, probed in this order for every exchange
pub const MAIL_PORTS: [u16; 3] = [25, 587, 465];
/// Client-to-server and server-to-server XMPP
pub const XMPP_FALLBACK_PORTS: [u16; 2] = [5222, 5269];
pub const XMPP_CLIENT_SRV_PREFIX: &str = "_xmpp-client._tcp.";
pub const XMPP_SERVER_SRV_PREFIX: &str = "_xmpp-server._tcp.";
pub const XMPP_FALLBACK_LABELS: [&str; 2] = ["jabber.", "xmpp."];
pub const WWW_LABEL: &str = "www.";

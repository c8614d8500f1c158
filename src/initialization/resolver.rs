//! DNS resolver initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, warn};
use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::system_conf::read_system_conf;
use trust_dns_resolver::TokioAsyncResolver;

use crate::config::{DNS_ATTEMPTS, DNS_TIMEOUT};
use crate::dns::ResolverClient;
use crate::error_handling::InitializationError;

/// Builds the resolver options shared by every query: 5 s per query, one
/// attempt, no search-domain expansion.
fn resolver_opts(base: ResolverOpts) -> ResolverOpts {
    let mut opts = base;
    opts.timeout = DNS_TIMEOUT;
    opts.attempts = DNS_ATTEMPTS;
    opts.ndots = 0;
    opts
}

/// Initializes the DNS client.
///
/// With `nameserver` set, every query goes to that address only. Otherwise the
/// system configuration (`/etc/resolv.conf`) is used.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if the system configuration
/// cannot be read.
pub fn init_resolver(
    nameserver: Option<SocketAddr>,
) -> Result<Arc<ResolverClient>, InitializationError> {
    let (config, opts) = match nameserver {
        Some(addr) => {
            debug!("Using nameserver {addr}");
            let group = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
            (
                ResolverConfig::from_parts(None, vec![], group),
                ResolverOpts::default(),
            )
        }
        None => read_system_conf().map_err(|e| {
            warn!("Failed to read system resolver configuration: {e}");
            InitializationError::DnsResolverError(e.to_string())
        })?,
    };

    let resolver = TokioAsyncResolver::tokio(config, resolver_opts(opts));
    Ok(Arc::new(ResolverClient::new(resolver)))
}

//! DNS record queries (A, MX, SRV, TLSA).
//!
//! Every query is a single attempt bounded by the resolver's per-query timeout
//! and an overall lifetime. Whatever goes wrong is reported as
//! [`DnsAnswer::Empty`].

use std::net::Ipv4Addr;
use std::time::Duration;

use futures::future::BoxFuture;
use log::debug;
use trust_dns_resolver::error::ResolveErrorKind;
use trust_dns_resolver::proto::op::ResponseCode;
use trust_dns_resolver::proto::rr::{RData, RecordType};
use trust_dns_resolver::TokioAsyncResolver;

use crate::config::DNS_LIFETIME;
use crate::dane::TlsaResource;
use crate::dns::{DnsAnswer, SrvTarget};

/// The queries the survey needs.
///
/// Names in answers (MX exchanges, SRV targets) are returned as the resolver
/// renders them, possibly with a trailing root dot.
pub trait DnsLookup: Send + Sync {
    fn lookup_a<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<Ipv4Addr>>;

    /// Mail exchanges in answer order.
    fn lookup_mx<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<String>>;

    fn lookup_srv<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<SrvTarget>>;

    fn lookup_tlsa<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<TlsaResource>>;
}

/// [`DnsLookup`] backed by `trust-dns-resolver`.
pub struct ResolverClient {
    resolver: TokioAsyncResolver,
    lifetime: Duration,
}

impl ResolverClient {
    pub fn new(resolver: TokioAsyncResolver) -> Self {
        Self::with_lifetime(resolver, DNS_LIFETIME)
    }

    pub fn with_lifetime(resolver: TokioAsyncResolver, lifetime: Duration) -> Self {
        ResolverClient { resolver, lifetime }
    }

    /// Runs one lookup and keeps the records `extract` accepts.
    ///
    /// Records of other types in the answer (e.g. CNAMEs on the way) are skipped;
    /// an answer left without records is `Empty`.
    async fn query<T>(
        &self,
        name: &str,
        record_type: RecordType,
        extract: impl Fn(&RData) -> Option<T>,
    ) -> DnsAnswer<T> {
        debug!("send query {name}[{record_type}]");
        match tokio::time::timeout(self.lifetime, self.resolver.lookup(name, record_type)).await {
            Ok(Ok(lookup)) => {
                let records: Vec<T> = lookup.iter().filter_map(&extract).collect();
                if records.is_empty() {
                    debug!("NoAnswer: {name}[{record_type}]");
                } else {
                    debug!("has ans for {name}[{record_type}]");
                }
                DnsAnswer::from_records(records)
            }
            Ok(Err(e)) => {
                let cause = match e.kind() {
                    ResolveErrorKind::NoRecordsFound { response_code, .. }
                        if *response_code == ResponseCode::NXDomain =>
                    {
                        "NXDOMAIN"
                    }
                    ResolveErrorKind::NoRecordsFound { .. } => "NoAnswer",
                    ResolveErrorKind::Timeout => "Timeout",
                    _ => "Other exception",
                };
                debug!("{cause}: {name}[{record_type}]: {e}");
                DnsAnswer::Empty
            }
            Err(_) => {
                debug!(
                    "Timeout: {name}[{record_type}] exceeded {}s lifetime",
                    self.lifetime.as_secs()
                );
                DnsAnswer::Empty
            }
        }
    }
}

impl DnsLookup for ResolverClient {
    fn lookup_a<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<Ipv4Addr>> {
        Box::pin(self.query(name, RecordType::A, |rdata| match rdata {
            RData::A(a) => Some(a.0),
            _ => None,
        }))
    }

    fn lookup_mx<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<String>> {
        Box::pin(self.query(name, RecordType::MX, |rdata| match rdata {
            RData::MX(mx) => Some(mx.exchange().to_utf8()),
            _ => None,
        }))
    }

    fn lookup_srv<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<SrvTarget>> {
        Box::pin(self.query(name, RecordType::SRV, |rdata| match rdata {
            RData::SRV(srv) => Some(SrvTarget::new(srv.target().to_utf8(), srv.port())),
            _ => None,
        }))
    }

    fn lookup_tlsa<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<TlsaResource>> {
        Box::pin(self.query(name, RecordType::TLSA, |rdata| match rdata {
            RData::TLSA(tlsa) => Some(TlsaResource::new(
                u8::from(tlsa.cert_usage()),
                u8::from(tlsa.selector()),
                u8::from(tlsa.matching()),
                tlsa.cert_data().to_vec(),
            )),
            _ => None,
        }))
    }
}

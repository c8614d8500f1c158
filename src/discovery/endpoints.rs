//! Which `(name, port)` pairs to probe for a domain.

use log::debug;

use crate::config::{
    HTTPS_PORT, MAIL_PORTS, WWW_LABEL, XMPP_CLIENT_SRV_PREFIX, XMPP_FALLBACK_LABELS,
    XMPP_FALLBACK_PORTS, XMPP_SERVER_SRV_PREFIX,
};
use crate::dns::{strip_root_dot, DnsLookup};

/// How an endpoint was derived from the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointOrigin {
    /// The domain itself or a fixed label under it.
    Direct,
    /// An MX exchange of the domain.
    MxDerived,
    /// An SRV target of the domain.
    SrvDerived,
    /// Guessed because the service record was absent.
    Fallback,
}

/// A TLS service to look for TLSA records on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub name: String,
    pub port: u16,
    pub origin: EndpointOrigin,
}

impl ServiceEndpoint {
    pub fn new(name: impl Into<String>, port: u16, origin: EndpointOrigin) -> Self {
        ServiceEndpoint {
            name: name.into(),
            port,
            origin,
        }
    }
}

/// Lists the endpoints of `domain` in probing order.
///
/// 1. HTTPS on the domain and on its `www.` name.
/// 2. SMTP ports on every MX exchange, or on the domain itself without MX.
/// 3. XMPP client SRV targets, then XMPP server SRV targets. Only when the
///    server query comes back empty are `jabber.` and `xmpp.` guessed; the
///    client query has no say in that.
pub async fn discover_endpoints(dns: &dyn DnsLookup, domain: &str) -> Vec<ServiceEndpoint> {
    let qn = strip_root_dot(domain);
    let mut endpoints = vec![
        ServiceEndpoint::new(qn, HTTPS_PORT, EndpointOrigin::Direct),
        ServiceEndpoint::new(format!("{WWW_LABEL}{qn}"), HTTPS_PORT, EndpointOrigin::Direct),
    ];

    let exchanges = dns.lookup_mx(qn).await;
    if exchanges.is_empty() {
        debug!("no MX for {qn}, probing mail ports on the domain");
        endpoints.extend(
            MAIL_PORTS
                .iter()
                .map(|&port| ServiceEndpoint::new(qn, port, EndpointOrigin::Fallback)),
        );
    } else {
        for exchange in exchanges.records() {
            endpoints.extend(MAIL_PORTS.iter().map(|&port| {
                ServiceEndpoint::new(exchange.clone(), port, EndpointOrigin::MxDerived)
            }));
        }
    }

    let client = dns.lookup_srv(&format!("{XMPP_CLIENT_SRV_PREFIX}{qn}")).await;
    endpoints.extend(
        client
            .records()
            .iter()
            .map(|srv| ServiceEndpoint::new(srv.target.clone(), srv.port, EndpointOrigin::SrvDerived)),
    );

    let server = dns.lookup_srv(&format!("{XMPP_SERVER_SRV_PREFIX}{qn}")).await;
    if server.is_empty() {
        for label in XMPP_FALLBACK_LABELS {
            endpoints.extend(XMPP_FALLBACK_PORTS.iter().map(|&port| {
                ServiceEndpoint::new(format!("{label}{qn}"), port, EndpointOrigin::Fallback)
            }));
        }
    } else {
        endpoints.extend(
            server
                .records()
                .iter()
                .map(|srv| ServiceEndpoint::new(srv.target.clone(), srv.port, EndpointOrigin::SrvDerived)),
        );
    }

    endpoints
}

//! Discovery module tests.

use super::*;
use crate::cert::{CertificateChain, CertificateFetcher};
use crate::dane::{TlsaResource, ValidationOutcome};
use crate::dns::{DnsAnswer, DnsLookup, SrvTarget};
use crate::error_handling::SurveyCounter;
use crate::storage::test_helpers::{create_test_recorder, test_round};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

const LEAF_PEM: &[u8] = include_bytes!("../../tests/fixtures/leaf.pem");
const LEAF_SPKI_SHA256: &str = "009c77dc52df15e417d854bd6c722832235b881a0242853b3040d08a62df2706";

/// DNS double answering from fixed tables and logging every query.
#[derive(Default)]
struct TableDns {
    a: Vec<String>,
    mx: HashMap<String, Vec<String>>,
    srv: HashMap<String, Vec<SrvTarget>>,
    tlsa: HashMap<String, Vec<TlsaResource>>,
    queries: Mutex<Vec<String>>,
}

impl TableDns {
    fn log(&self, kind: &str, name: &str) {
        self.queries
            .lock()
            .expect("lock")
            .push(format!("{kind} {name}"));
    }
}

impl DnsLookup for TableDns {
    fn lookup_a<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<Ipv4Addr>> {
        self.log("A", name);
        let found = self.a.iter().any(|n| n == name);
        Box::pin(async move {
            if found {
                DnsAnswer::Answer(vec![Ipv4Addr::new(192, 0, 2, 10)])
            } else {
                DnsAnswer::Empty
            }
        })
    }

    fn lookup_mx<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<String>> {
        self.log("MX", name);
        let records = self.mx.get(name).cloned().unwrap_or_default();
        Box::pin(async move { DnsAnswer::from_records(records) })
    }

    fn lookup_srv<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<SrvTarget>> {
        self.log("SRV", name);
        let records = self.srv.get(name).cloned().unwrap_or_default();
        Box::pin(async move { DnsAnswer::from_records(records) })
    }

    fn lookup_tlsa<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<TlsaResource>> {
        self.log("TLSA", name);
        let records = self.tlsa.get(name).cloned().unwrap_or_default();
        Box::pin(async move { DnsAnswer::from_records(records) })
    }
}

struct LeafFetcher;

impl CertificateFetcher for LeafFetcher {
    fn fetch<'a>(
        &'a self,
        _host: &'a str,
        _port: u16,
        _sni: Option<&'a str>,
    ) -> BoxFuture<'a, Option<CertificateChain>> {
        Box::pin(async { CertificateChain::from_pem(LEAF_PEM) })
    }
}

fn pairs(endpoints: &[ServiceEndpoint]) -> Vec<(String, u16)> {
    endpoints
        .iter()
        .map(|e| (e.name.clone(), e.port))
        .collect()
}

fn leaf_record() -> TlsaResource {
    TlsaResource::new(3, 1, 1, hex::decode(LEAF_SPKI_SHA256).expect("hex"))
}

async fn context(dns: impl Into<Arc<TableDns>>) -> SurveyContext {
    let dns: Arc<TableDns> = dns.into();
    SurveyContext::new(
        dns,
        Arc::new(LeafFetcher),
        Arc::new(create_test_recorder().await),
        test_round(),
    )
}

#[tokio::test]
async fn test_bare_domain_endpoint_order() {
    let dns = TableDns::default();
    let endpoints = discover_endpoints(&dns, "example.com.").await;

    let expected: Vec<(String, u16)> = [
        ("example.com", 443),
        ("www.example.com", 443),
        ("example.com", 25),
        ("example.com", 587),
        ("example.com", 465),
        ("jabber.example.com", 5222),
        ("jabber.example.com", 5269),
        ("xmpp.example.com", 5222),
        ("xmpp.example.com", 5269),
    ]
    .iter()
    .map(|(n, p)| (n.to_string(), *p))
    .collect();
    assert_eq!(pairs(&endpoints), expected);
    assert_eq!(endpoints[0].origin, EndpointOrigin::Direct);
    assert_eq!(endpoints[1].origin, EndpointOrigin::Direct);
    assert!(endpoints[2..].iter().all(|e| e.origin == EndpointOrigin::Fallback));
}

#[tokio::test]
async fn test_two_exchanges_give_six_mail_endpoints() {
    let mut dns = TableDns::default();
    dns.mx.insert(
        "example.com".into(),
        vec!["mx2.example.com.".into(), "mx1.example.com.".into()],
    );
    let endpoints = discover_endpoints(&dns, "example.com").await;
    let mail: Vec<_> = endpoints
        .iter()
        .filter(|e| e.origin == EndpointOrigin::MxDerived)
        .map(|e| (e.name.as_str(), e.port))
        .collect();
    assert_eq!(
        mail,
        vec![
            ("mx2.example.com.", 25),
            ("mx2.example.com.", 587),
            ("mx2.example.com.", 465),
            ("mx1.example.com.", 25),
            ("mx1.example.com.", 587),
            ("mx1.example.com.", 465),
        ]
    );
    // No fallback to the domain itself when MX exists.
    assert!(!endpoints
        .iter()
        .any(|e| e.name == "example.com" && e.port == 25));
}

#[tokio::test]
async fn test_client_srv_does_not_suppress_fallback() {
    let mut dns = TableDns::default();
    dns.srv.insert(
        "_xmpp-client._tcp.example.com".into(),
        vec![SrvTarget::new("chat.example.com.", 5222)],
    );
    let endpoints = discover_endpoints(&dns, "example.com").await;

    assert!(endpoints.contains(&ServiceEndpoint::new(
        "chat.example.com.",
        5222,
        EndpointOrigin::SrvDerived
    )));
    let fallbacks = endpoints
        .iter()
        .filter(|e| e.name.starts_with("jabber.") || e.name.starts_with("xmpp."))
        .count();
    assert_eq!(fallbacks, 4);
}

#[tokio::test]
async fn test_server_srv_suppresses_fallback() {
    let mut dns = TableDns::default();
    dns.srv.insert(
        "_xmpp-server._tcp.example.com".into(),
        vec![
            SrvTarget::new("xmpp1.example.com.", 5269),
            SrvTarget::new("xmpp2.example.com.", 5270),
        ],
    );
    let endpoints = discover_endpoints(&dns, "example.com").await;
    let tail: Vec<_> = pairs(&endpoints).into_iter().skip(5).collect();
    assert_eq!(
        tail,
        vec![
            ("xmpp1.example.com.".to_string(), 5269),
            ("xmpp2.example.com.".to_string(), 5270),
        ]
    );
}

#[tokio::test]
async fn test_probe_endpoint_without_tlsa_writes_nothing() {
    let ctx = context(TableDns::default()).await;
    assert_eq!(probe_endpoint(&ctx, "example.com", 443, 0).await, None);
    assert_eq!(ctx.recorder.row_count().await.expect("count"), 0);
    assert_eq!(ctx.stats.count(SurveyCounter::EndpointsProbed), 1);
    assert_eq!(ctx.stats.count(SurveyCounter::EndpointsWithTlsa), 0);
    assert_eq!(ctx.stats.total_outcomes(), 0);
}

#[tokio::test]
async fn test_probe_endpoint_strips_root_dot() {
    let mut dns = TableDns::default();
    dns.a.push("mx1.example.com".into());
    dns.tlsa
        .insert("_25._tcp.mx1.example.com".into(), vec![leaf_record()]);
    let ctx = context(dns).await;

    let outcome = probe_endpoint(&ctx, "mx1.example.com.", 25, 3).await;
    assert_eq!(outcome, Some(ValidationOutcome::Ok));
    assert_eq!(ctx.recorder.row_count().await.expect("count"), 1);
}

#[tokio::test]
async fn test_probe_endpoint_writes_row_per_record_with_shared_outcome() {
    let mut dns = TableDns::default();
    dns.a.push("example.com".into());
    dns.tlsa.insert(
        "_443._tcp.example.com".into(),
        vec![
            TlsaResource::new(3, 1, 1, vec![0u8; 32]),
            leaf_record(),
            TlsaResource::new(7, 1, 1, vec![0u8; 32]),
        ],
    );
    let ctx = context(dns).await;

    assert_eq!(
        probe_endpoint(&ctx, "example.com", 443, 0).await,
        Some(ValidationOutcome::Ok)
    );
    assert_eq!(ctx.recorder.row_count().await.expect("count"), 3);
    assert_eq!(ctx.stats.count(SurveyCounter::RowsInserted), 3);
    assert_eq!(ctx.stats.outcome_count(ValidationOutcome::Ok), 1);
}

#[tokio::test]
async fn test_probe_endpoint_without_address_is_no_ip() {
    let mut dns = TableDns::default();
    dns.tlsa
        .insert("_443._tcp.example.com".into(), vec![leaf_record()]);
    let ctx = context(dns).await;

    assert_eq!(
        probe_endpoint(&ctx, "example.com", 443, 0).await,
        Some(ValidationOutcome::NoIp)
    );
    assert_eq!(ctx.recorder.row_count().await.expect("count"), 1);
}

#[tokio::test]
async fn test_survey_domain_probes_in_order() {
    let mut dns = TableDns::default();
    dns.a.push("www.example.com".into());
    dns.tlsa
        .insert("_443._tcp.www.example.com".into(), vec![leaf_record()]);
    let dns = Arc::new(dns);
    let ctx = context(dns.clone()).await;

    let results = survey_domain(&ctx, "example.com", 1).await;
    let tlsa_queries: Vec<String> = dns
        .queries
        .lock()
        .expect("lock")
        .iter()
        .filter_map(|q| q.strip_prefix("TLSA ").map(str::to_string))
        .collect();
    assert_eq!(
        tlsa_queries,
        vec![
            "_443._tcp.example.com",
            "_443._tcp.www.example.com",
            "_25._tcp.example.com",
            "_587._tcp.example.com",
            "_465._tcp.example.com",
            "_5222._tcp.jabber.example.com",
            "_5269._tcp.jabber.example.com",
            "_5222._tcp.xmpp.example.com",
            "_5269._tcp.xmpp.example.com",
        ]
    );
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0.name, "www.example.com");
    assert_eq!(results[0].1, ValidationOutcome::Ok);
    assert_eq!(ctx.stats.count(SurveyCounter::DomainsCompleted), 1);
    assert_eq!(ctx.stats.count(SurveyCounter::EndpointsProbed), 9);
}

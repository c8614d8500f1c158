// Shared test helpers: DNS and certificate doubles, fixtures and database access.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use sqlx::{Connection, Row, SqliteConnection};
use tempfile::NamedTempFile;

use tlsa_survey::{
    CertificateChain, CertificateFetcher, Config, DnsAnswer, DnsLookup, LogFormat, LogLevel,
    SrvTarget, TlsaResource,
};

pub const LEAF_SPKI_SHA256: &str =
    "009c77dc52df15e417d854bd6c722832235b881a0242853b3040d08a62df2706";
pub const LEAF_DER_SHA256: &str =
    "132322839ffa0906648e047b5caae21776eb052353ac9a54f1abaaac8e3f755d";
pub const LEAF_DER_SHA512: &str = "34d2b77f9e98a8edc8778564611ce357eb1209286fb66703446f2a684ade5566550023d82c93ad6bf86dae97374eb68a320cdc2e4b38a2327d93a152c777b76d";
pub const CA_DER_SHA256: &str =
    "36ec097a7b2317d3c1f510215c17fb8a9dce9e6f4cfffd6b3d394d2f75e9bff6";
pub const OTHER_SPKI_SHA256: &str =
    "1c69079e07d6daf563809a696515e1e707a5d6024120c41bd53c3169fed09b14";

/// Path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Loads a PEM fixture as a certificate chain.
pub fn fixture_chain(name: &str) -> CertificateChain {
    let pem = std::fs::read(fixture_path(name)).expect("Failed to read fixture");
    CertificateChain::from_pem(&pem).expect("Fixture should hold a certificate")
}

/// A TLSA record whose association data is the given hex digest.
pub fn tlsa(usage: u8, selector: u8, mtype: u8, data_hex: &str) -> TlsaResource {
    TlsaResource::new(usage, selector, mtype, hex::decode(data_hex).expect("valid hex"))
}

/// DNS double answering from fixed tables.
///
/// Every query is logged as `"TYPE name"` so tests can assert what was asked
/// and in which order.
#[derive(Default)]
pub struct StaticDns {
    a: Vec<String>,
    mx: HashMap<String, Vec<String>>,
    srv: HashMap<String, Vec<SrvTarget>>,
    tlsa: HashMap<String, Vec<TlsaResource>>,
    queries: Mutex<Vec<String>>,
}

impl StaticDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_a(mut self, name: &str) -> Self {
        self.a.push(name.to_string());
        self
    }

    pub fn with_mx(mut self, name: &str, exchanges: &[&str]) -> Self {
        self.mx.insert(
            name.to_string(),
            exchanges.iter().map(|e| e.to_string()).collect(),
        );
        self
    }

    pub fn with_srv(mut self, name: &str, targets: &[(&str, u16)]) -> Self {
        self.srv.insert(
            name.to_string(),
            targets.iter().map(|(t, p)| SrvTarget::new(*t, *p)).collect(),
        );
        self
    }

    /// Publishes `records` at `_PORT._tcp.NAME`.
    pub fn with_tlsa(mut self, name: &str, port: u16, records: Vec<TlsaResource>) -> Self {
        self.tlsa.insert(format!("_{port}._tcp.{name}"), records);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("lock").clone()
    }

    /// Logged queries of one type, without the type prefix.
    pub fn queries_of(&self, kind: &str) -> Vec<String> {
        let prefix = format!("{kind} ");
        self.queries()
            .into_iter()
            .filter_map(|q| q.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    fn log(&self, kind: &str, name: &str) {
        self.queries
            .lock()
            .expect("lock")
            .push(format!("{kind} {name}"));
    }
}

impl DnsLookup for StaticDns {
    fn lookup_a<'a>(&'a self, name: &'a str) -> BoxFuture<'a, DnsAnswer<Ipv4Addr>> {
        self.log("A", name);
        let found = self.a.iter().any(|n| n == name);
        Box::pin(async move {
            if found {
                DnsAnswer::Answer(vec![Ipv4Addr::new(192, 0, 2, 1)])
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

/// One call made to [`RecordingFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub host: String,
    pub port: u16,
    pub sni: Option<String>,
}

/// Certificate fetcher double that serves one chain to every caller and
/// remembers each call.
pub struct RecordingFetcher {
    chain: Option<CertificateChain>,
    calls: Mutex<Vec<FetchCall>>,
}

impl RecordingFetcher {
    pub fn serving(fixture: &str) -> Self {
        RecordingFetcher {
            chain: Some(fixture_chain(fixture)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A fetcher for which every retrieval fails.
    pub fn failing() -> Self {
        RecordingFetcher {
            chain: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().expect("lock").clone()
    }
}

impl CertificateFetcher for RecordingFetcher {
    fn fetch<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        sni: Option<&'a str>,
    ) -> BoxFuture<'a, Option<CertificateChain>> {
        self.calls.lock().expect("lock").push(FetchCall {
            host: host.to_string(),
            port,
            sni: sni.map(str::to_string),
        });
        let chain = self.chain.clone();
        Box::pin(async move { chain })
    }
}

/// Certificate fetcher that panics for one host and serves `leaf.pem`
/// to everyone else.
pub struct PanickingFetcher {
    host: String,
    inner: RecordingFetcher,
}

impl PanickingFetcher {
    pub fn for_host(host: &str) -> Self {
        PanickingFetcher {
            host: host.to_string(),
            inner: RecordingFetcher::serving("leaf.pem"),
        }
    }
}

impl CertificateFetcher for PanickingFetcher {
    fn fetch<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        sni: Option<&'a str>,
    ) -> BoxFuture<'a, Option<CertificateChain>> {
        if host == self.host {
            panic!("certificate retrieval for {host} blew up");
        }
        self.inner.fetch(host, port, sni)
    }
}

/// Writes one domain per line to a temporary input file.
pub fn write_domains(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write domain");
    }
    file.flush().expect("Failed to flush file");
    file
}

/// A quiet configuration reading `input` and writing `db_path`.
pub fn test_config(input: &Path, db_path: &Path) -> Config {
    Config {
        input: input.to_path_buf(),
        db_path: db_path.to_path_buf(),
        threads: 4,
        log_level: LogLevel::Error,
        log_format: LogFormat::Plain,
        ..Default::default()
    }
}

/// A stored outcome row, reduced to the columns tests care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub name: String,
    pub port: u16,
    pub valid_info: String,
    pub params: (u8, u8, u8),
    pub cert_info: String,
}

/// Reads every row of `table`, ordered by name, port and parameters.
pub async fn stored_rows(db_path: &Path, table: &str) -> Vec<StoredRow> {
    let mut conn = SqliteConnection::connect(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to open result database");
    let sql = format!(
        "SELECT name, port, valid_info, cert_usage, selector, mtype, cert_info FROM {table} \
         ORDER BY name, port, cert_usage, selector, mtype"
    );
    let rows = sqlx::query(&sql)
        .fetch_all(&mut conn)
        .await
        .expect("Failed to read rows");
    rows.iter()
        .map(|row| StoredRow {
            name: row.get("name"),
            port: row.get::<i64, _>("port") as u16,
            valid_info: row.get("valid_info"),
            params: (
                row.get::<i64, _>("cert_usage") as u8,
                row.get::<i64, _>("selector") as u8,
                row.get::<i64, _>("mtype") as u8,
            ),
            cert_info: row.get("cert_info"),
        })
        .collect()
}

/// Wraps a double for the `run_*_with` entry points while keeping a handle.
pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}

//! Certificate retrieval through an external program.
//!
//! The survey never speaks TLS itself. A helper program (typically a wrapper
//! around `openssl s_client -showcerts`) is invoked as
//!
//! ```text
//! PROGRAM -n HOST -p PORT [-s SNI] -a
//! ```
//!
//! and must print the presented certificates as PEM, leaf first. A non-zero exit
//! status, empty output or output without a parseable certificate all mean
//! "no certificate" for that retrieval context.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use futures::future::BoxFuture;
use log::{debug, warn};
use tokio::process::Command;

use crate::cert::CertificateChain;
use crate::dns::strip_root_dot;

/// How a chain was retrieved: with the service name sent as SNI, or without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Retrieval {
    Sni,
    Plain,
}

impl Retrieval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Retrieval::Sni => "sni",
            Retrieval::Plain => "norm",
        }
    }

    /// Heading used when a mismatch under this retrieval is logged.
    pub fn diagnostic_label(&self) -> &'static str {
        match self {
            Retrieval::Sni => "SNI",
            Retrieval::Plain => "Norm",
        }
    }
}

impl std::fmt::Display for Retrieval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of server certificate chains.
///
/// Implementations absorb every failure and return `None`; callers only ever
/// see "a chain" or "no chain".
pub trait CertificateFetcher: Send + Sync {
    /// Retrieves the chain presented by `host:port`, sending `sni` as the
    /// server name when given.
    fn fetch<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        sni: Option<&'a str>,
    ) -> BoxFuture<'a, Option<CertificateChain>>;
}

/// Runs the configured certificate program once per fetch.
#[derive(Debug, Clone)]
pub struct ExternalFetcher {
    program: PathBuf,
}

impl ExternalFetcher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ExternalFetcher {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn run(&self, host: &str, port: u16, sni: Option<&str>) -> Option<CertificateChain> {
        // openssl refuses names with the root dot
        let host = strip_root_dot(host);
        let mut cmd = Command::new(&self.program);
        cmd.arg("-n").arg(host).arg("-p").arg(port.to_string());
        if let Some(sni) = sni.map(strip_root_dot).filter(|s| !s.is_empty()) {
            cmd.arg("-s").arg(sni);
        }
        cmd.arg("-a")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match cmd.output().await {
            Ok(output) if !output.status.success() => {
                debug!(
                    "Certificate program exited with {} for {host}:[{port}]",
                    output.status
                );
                None
            }
            Ok(output) => CertificateChain::from_pem(&output.stdout),
            Err(e) => {
                warn!(
                    "Failed to run certificate program {}: {e}",
                    self.program.display()
                );
                None
            }
        }
    }
}

impl CertificateFetcher for ExternalFetcher {
    fn fetch<'a>(
        &'a self,
        host: &'a str,
        port: u16,
        sni: Option<&'a str>,
    ) -> BoxFuture<'a, Option<CertificateChain>> {
        Box::pin(self.run(host, port, sni))
    }
}

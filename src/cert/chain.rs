//! Certificate chains as presented by a server.

use log::warn;
use x509_parser::pem::Pem;

use crate::error_handling::CertificateError;

const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// One X.509 certificate, kept as the two encodings a TLSA selector can pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
    spki: Vec<u8>,
}

impl Certificate {
    /// Parses a DER certificate and extracts its SubjectPublicKeyInfo.
    ///
    /// # Errors
    ///
    /// Returns `CertificateError::X509Error` if the bytes are not a certificate.
    pub fn from_der(der: Vec<u8>) -> Result<Self, CertificateError> {
        let spki = {
            let (_, cert) = x509_parser::parse_x509_certificate(&der)
                .map_err(|e| CertificateError::X509Error(e.to_string()))?;
            cert.public_key().raw.to_vec()
        };
        Ok(Certificate { der, spki })
    }

    /// Full certificate, DER encoded (selector 0).
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// SubjectPublicKeyInfo, DER encoded (selector 1).
    pub fn spki(&self) -> &[u8] {
        &self.spki
    }
}

/// Certificates retrieved in one fetch context, leaf first.
///
/// A chain is never empty: a fetch that produced no certificate yields no chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    certs: Vec<Certificate>,
}

impl CertificateChain {
    /// Builds a chain from already parsed certificates.
    ///
    /// Returns `None` for an empty list.
    pub fn new(certs: Vec<Certificate>) -> Option<Self> {
        if certs.is_empty() {
            None
        } else {
            Some(CertificateChain { certs })
        }
    }

    /// Parses concatenated PEM certificates in chain order.
    ///
    /// Blocks that are not certificates are skipped, unparseable certificates
    /// are dropped with a warning. Returns `None` when nothing usable remains.
    pub fn from_pem(data: &[u8]) -> Option<Self> {
        let mut certs = Vec::new();
        for pem in Pem::iter_from_buffer(data) {
            match pem {
                Ok(pem) if pem.label == CERTIFICATE_LABEL => {
                    match Certificate::from_der(pem.contents) {
                        Ok(cert) => certs.push(cert),
                        Err(e) => warn!("Skipping unparseable certificate: {e}"),
                    }
                }
                Ok(pem) => log::debug!("Skipping PEM block labelled {}", pem.label),
                Err(e) => {
                    warn!("{}", CertificateError::PemError(e.to_string()));
                    break;
                }
            }
        }
        Self::new(certs)
    }

    /// The end-entity certificate.
    pub fn leaf(&self) -> &Certificate {
        &self.certs[0]
    }

    /// All certificates, leaf first.
    pub fn certificates(&self) -> &[Certificate] {
        &self.certs
    }

    pub fn len(&self) -> usize {
        self.certs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }
}

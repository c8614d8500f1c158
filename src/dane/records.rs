//! TLSA record parameters (RFC 6698 section 2.1).

use sha2::{Digest, Sha256, Sha512};

use crate::cert::Certificate;

/// TLSA certificate usage field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CertUsage {
    CaPkixTa = 0,
    ServicePkixEe = 1,
    TrustAnchorAssertion = 2,
    DomainIssuedCertificate = 3,
}

impl CertUsage {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CertUsage::CaPkixTa),
            1 => Some(CertUsage::ServicePkixEe),
            2 => Some(CertUsage::TrustAnchorAssertion),
            3 => Some(CertUsage::DomainIssuedCertificate),
            _ => None,
        }
    }

    /// Trust-anchor usages (0, 2) may match any certificate in the chain;
    /// end-entity usages (1, 3) only the leaf.
    pub fn matches_any_in_chain(&self) -> bool {
        matches!(
            self,
            CertUsage::CaPkixTa | CertUsage::TrustAnchorAssertion
        )
    }
}

/// TLSA selector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Selector {
    FullCertificate = 0,
    SubjectPublicKeyInfo = 1,
}

impl Selector {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Selector::FullCertificate),
            1 => Some(Selector::SubjectPublicKeyInfo),
            _ => None,
        }
    }

    /// The bytes of `cert` this selector refers to.
    pub fn select<'c>(&self, cert: &'c Certificate) -> &'c [u8] {
        match self {
            Selector::FullCertificate => cert.der(),
            Selector::SubjectPublicKeyInfo => cert.spki(),
        }
    }
}

/// TLSA matching type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MatchingType {
    Exact = 0,
    Sha256 = 1,
    Sha512 = 2,
}

impl MatchingType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(MatchingType::Exact),
            1 => Some(MatchingType::Sha256),
            2 => Some(MatchingType::Sha512),
            _ => None,
        }
    }

    /// Lowercase hex of `data` as this matching type presents it.
    pub fn digest_hex(&self, data: &[u8]) -> String {
        match self {
            MatchingType::Exact => hex::encode(data),
            MatchingType::Sha256 => hex::encode(Sha256::digest(data)),
            MatchingType::Sha512 => hex::encode(Sha512::digest(data)),
        }
    }
}

/// One TLSA resource record as received.
///
/// Fields are kept as raw octets so that records with unassigned values can
/// still be stored; [`TlsaResource::parameters`] gives the typed view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TlsaResource {
    pub cert_usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub cert_data: Vec<u8>,
}

impl TlsaResource {
    pub fn new(cert_usage: u8, selector: u8, matching_type: u8, cert_data: Vec<u8>) -> Self {
        TlsaResource {
            cert_usage,
            selector,
            matching_type,
            cert_data,
        }
    }

    /// Typed parameters, or `None` if any field is out of range.
    pub fn parameters(&self) -> Option<(CertUsage, Selector, MatchingType)> {
        Some((
            CertUsage::from_u8(self.cert_usage)?,
            Selector::from_u8(self.selector)?,
            MatchingType::from_u8(self.matching_type)?,
        ))
    }

    /// True when usage is 0-3, selector 0-1 and matching type 0-2.
    pub fn has_valid_parameters(&self) -> bool {
        self.parameters().is_some()
    }

    /// Certificate association data as lowercase hex.
    pub fn cert_data_hex(&self) -> String {
        hex::encode(&self.cert_data)
    }
}

impl std::fmt::Display for TlsaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.cert_usage,
            self.selector,
            self.matching_type,
            self.cert_data_hex()
        )
    }
}

//! Server certificate retrieval and parsing.
//!
//! Certificates come from an external program (see [`ExternalFetcher`]) and are
//! parsed with `x509-parser` into the DER and SubjectPublicKeyInfo encodings that
//! TLSA selectors refer to.

mod chain;
mod fetcher;

// Re-export public API
pub use chain::{Certificate, CertificateChain};
pub use fetcher::{CertificateFetcher, ExternalFetcher, Retrieval};

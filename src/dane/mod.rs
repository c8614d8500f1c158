//! DANE validation of presented certificates against TLSA records.
//!
//! Matching follows RFC 6698: the certificate usage decides which certificates
//! in the chain are eligible, the selector picks the full certificate or its
//! SubjectPublicKeyInfo, and the matching type compares raw bytes or a SHA-256 /
//! SHA-512 digest. PKIX path validation is not performed; usages 0 and 1 are
//! matched exactly like 2 and 3.

mod endpoint;
mod outcome;
mod records;
mod validate;

// Re-export public API
pub use endpoint::{validate_endpoint, EndpointValidation};
pub use outcome::ValidationOutcome;
pub use records::{CertUsage, MatchingType, Selector, TlsaResource};
pub use validate::{
    derive_outcome, evaluate_chain, evaluate_record, normalize_hex, ChainVerdict,
    EndpointCertificates, Mismatch, RecordEvaluation,
};

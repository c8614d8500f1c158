//! Endpoint validation outcomes.

use strum_macros::EnumIter as EnumIterMacro;

/// Result of probing one endpoint, stored in the `valid_info` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ValidationOutcome {
    /// At least one TLSA record matched a presented certificate.
    Ok,
    /// The name has no A record, so no certificate was fetched.
    NoIp,
    /// Neither retrieval produced a certificate.
    NoCert,
    /// No TLSA record to validate against.
    NoTlsa,
    /// Records were well-formed but none matched.
    BadHash,
    /// Nothing matched and at least one record had out-of-range parameters.
    BadPara,
    /// Derivation has not settled on anything yet.
    Empty,
}

impl ValidationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationOutcome::Ok => "OK",
            ValidationOutcome::NoIp => "NO-IP",
            ValidationOutcome::NoCert => "NO-CERT",
            ValidationOutcome::NoTlsa => "NO-TLSA",
            ValidationOutcome::BadHash => "BAD-HASH",
            ValidationOutcome::BadPara => "BAD-PARA",
            ValidationOutcome::Empty => "EMPTY",
        }
    }

    /// Precedence among the record-level outcomes: OK over BAD-PARA over BAD-HASH.
    fn rank(&self) -> u8 {
        match self {
            ValidationOutcome::Ok => 3,
            ValidationOutcome::BadPara => 2,
            ValidationOutcome::BadHash => 1,
            _ => 0,
        }
    }

    /// The stronger of two record-level outcomes.
    pub(crate) fn combine(self, other: ValidationOutcome) -> ValidationOutcome {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

impl std::fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

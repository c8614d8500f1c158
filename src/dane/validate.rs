//! Matching TLSA records against presented certificate chains.

use crate::cert::{CertificateChain, Retrieval};
use crate::dane::{TlsaResource, ValidationOutcome};

/// Canonical form for comparing hex strings: whitespace removed, uppercase.
pub fn normalize_hex(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// What the certificate produced versus what DNS published, both normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub computed: String,
    pub expected: String,
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "# from cert:{}\n# from DNS: {}",
            self.computed, self.expected
        )
    }
}

/// Result of checking one record against one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainVerdict {
    Matched,
    /// No certificate in scope matched; carries the last comparison made.
    Mismatch(Mismatch),
    /// The record's parameters are out of range; nothing was compared.
    BadParameters,
}

/// Checks `record` against `chain`.
///
/// Usages 0 and 2 try every certificate in order and stop at the first match;
/// usages 1 and 3 only look at the leaf.
pub fn evaluate_chain(record: &TlsaResource, chain: &CertificateChain) -> ChainVerdict {
    let Some((usage, selector, matching)) = record.parameters() else {
        return ChainVerdict::BadParameters;
    };

    let expected = normalize_hex(&record.cert_data_hex());
    let in_scope = if usage.matches_any_in_chain() {
        chain.certificates()
    } else {
        std::slice::from_ref(chain.leaf())
    };

    let mut last = None;
    for cert in in_scope {
        let computed = normalize_hex(&matching.digest_hex(selector.select(cert)));
        if computed == expected {
            return ChainVerdict::Matched;
        }
        last = Some(computed);
    }

    // A chain always holds a leaf, so at least one comparison happened.
    ChainVerdict::Mismatch(Mismatch {
        computed: last.unwrap_or_default(),
        expected,
    })
}

/// The chains retrieved for one endpoint, one per retrieval context.
#[derive(Debug, Clone, Default)]
pub struct EndpointCertificates {
    pub sni: Option<CertificateChain>,
    pub plain: Option<CertificateChain>,
}

impl EndpointCertificates {
    pub fn new(sni: Option<CertificateChain>, plain: Option<CertificateChain>) -> Self {
        EndpointCertificates { sni, plain }
    }

    /// True if either context produced a chain.
    pub fn any(&self) -> bool {
        self.sni.is_some() || self.plain.is_some()
    }

    /// Chains present, SNI first.
    pub fn contexts(&self) -> impl Iterator<Item = (Retrieval, &CertificateChain)> {
        self.sni
            .iter()
            .map(|c| (Retrieval::Sni, c))
            .chain(self.plain.iter().map(|c| (Retrieval::Plain, c)))
    }

    /// Presence tags for logging, e.g. `[sni][norm]`.
    pub fn presence(&self) -> String {
        self.contexts()
            .map(|(retrieval, _)| format!("[{retrieval}]"))
            .collect()
    }
}

/// Evaluation of one TLSA record across all retrieval contexts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEvaluation {
    pub bad_parameters: bool,
    pub matched_sni: bool,
    pub matched_plain: bool,
    /// Diagnostics for contexts that did not match.
    pub mismatches: Vec<(Retrieval, Mismatch)>,
}

impl RecordEvaluation {
    /// A match in either context matches the record.
    pub fn matched(&self) -> bool {
        self.matched_sni || self.matched_plain
    }

    /// This record's own contribution to the endpoint outcome.
    pub fn outcome(&self) -> ValidationOutcome {
        if self.matched() {
            ValidationOutcome::Ok
        } else if self.bad_parameters {
            ValidationOutcome::BadPara
        } else {
            ValidationOutcome::BadHash
        }
    }

    /// Match tags for logging, e.g. `[sni][norm]`.
    pub fn matched_tags(&self) -> String {
        let mut tags = String::new();
        if self.matched_sni {
            tags.push_str("[sni]");
        }
        if self.matched_plain {
            tags.push_str("[norm]");
        }
        tags
    }
}

/// Evaluates `record` independently against each retrieved chain.
pub fn evaluate_record(record: &TlsaResource, certs: &EndpointCertificates) -> RecordEvaluation {
    let mut evaluation = RecordEvaluation::default();
    for (retrieval, chain) in certs.contexts() {
        match evaluate_chain(record, chain) {
            ChainVerdict::Matched => match retrieval {
                Retrieval::Sni => evaluation.matched_sni = true,
                Retrieval::Plain => evaluation.matched_plain = true,
            },
            ChainVerdict::Mismatch(mismatch) => evaluation.mismatches.push((retrieval, mismatch)),
            ChainVerdict::BadParameters => evaluation.bad_parameters = true,
        }
    }
    evaluation
}

/// Final outcome for an endpoint.
///
/// Priority: NO-IP, NO-CERT, NO-TLSA, then across records OK over BAD-PARA over
/// BAD-HASH. The fold over records starts from EMPTY.
pub fn derive_outcome(
    has_address: bool,
    certs: &EndpointCertificates,
    evaluations: &[RecordEvaluation],
) -> ValidationOutcome {
    if !has_address {
        return ValidationOutcome::NoIp;
    }
    if !certs.any() {
        return ValidationOutcome::NoCert;
    }
    if evaluations.is_empty() {
        return ValidationOutcome::NoTlsa;
    }
    evaluations
        .iter()
        .fold(ValidationOutcome::Empty, |outcome, e| outcome.combine(e.outcome()))
}

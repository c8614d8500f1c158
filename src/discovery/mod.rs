//! Service discovery and probing.
//!
//! For each domain the survey looks at web (HTTPS), mail (SMTP on MX hosts)
//! and messaging (XMPP via SRV) endpoints, queries TLSA at
//! `_PORT._tcp.NAME`, and validates and records whatever it finds.

mod endpoints;
mod probe;

// Re-export public API
pub use endpoints::{discover_endpoints, EndpointOrigin, ServiceEndpoint};
pub use probe::{probe_endpoint, survey_domain, SurveyContext};

#[cfg(test)]
mod tests;

use super::RecordType;
use std::fmt;
use std::sync::Arc;

/// The question part of a request, as received (case and trailing dot
/// untouched). Matching works on [`crate::dns_record::normalize_domain`]
/// of `domain`; answers are owned by `domain` itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
        }
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.domain, self.record_type)
    }
}

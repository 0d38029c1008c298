use thiserror::Error;

/// Failures surfaced while answering a single query.
///
/// None of these are retried inside the resolver; the caller decides whether
/// the client sees SERVFAIL or nothing at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query cancelled: context canceled")]
    Cancelled,

    #[error("unsupported customDNS RR type {0}")]
    UnsupportedRecordType(String),

    #[error("CNAME loop detected: [{}]", .0.join(", "))]
    AliasLoop(Vec<String>),

    #[error("CNAME chain exceeds {max} hops: [{}]", .chain.join(", "))]
    AliasDepthExceeded { max: usize, chain: Vec<String> },

    #[error("Failed to build answer: {0}")]
    AnswerSynthesis(String),

    #[error("Upstream resolution failed: {0}")]
    Upstream(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),
}

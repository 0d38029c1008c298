use async_trait::async_trait;
use splitdns_domain::{DnsRequest, DomainError, ResourceRecord};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Which stage of the chain produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Answered from locally configured records.
    CustomDns,
    /// Answered by a later stage (upstream, cache, ...).
    Resolved,
    /// Nothing further down the chain could answer.
    NotResolved,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::CustomDns => "CUSTOMDNS",
            ResponseKind::Resolved => "RESOLVED",
            ResponseKind::NotResolved => "NOTRESOLVED",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct DnsResponse {
    /// Answer section, in emission order.
    pub answers: Vec<ResourceRecord>,
    pub kind: ResponseKind,
    /// Human-readable reason for query logs.
    pub reason: Arc<str>,
}

impl DnsResponse {
    pub fn new(answers: Vec<ResourceRecord>, kind: ResponseKind, reason: impl Into<Arc<str>>) -> Self {
        Self {
            answers,
            kind,
            reason: reason.into(),
        }
    }

    /// Locally answered, possibly with zero records (NOERROR/NODATA).
    pub fn custom_dns(answers: Vec<ResourceRecord>) -> Self {
        Self::new(answers, ResponseKind::CustomDns, "CUSTOM DNS")
    }
}

/// One stage of the resolver chain.
///
/// A stage either answers `request` itself or hands it to the stage it was
/// built with. `cancel` is the caller's query context; long-running stages
/// observe it and return [`DomainError::Cancelled`].
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(
        &self,
        request: &DnsRequest,
        cancel: &CancellationToken,
    ) -> Result<DnsResponse, DomainError>;

    /// Stage name for logs.
    fn name(&self) -> &'static str {
        "resolver"
    }
}

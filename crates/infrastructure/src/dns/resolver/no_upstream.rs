use async_trait::async_trait;
use splitdns_application::ports::{DnsResponse, DnsResolver, ResponseKind};
use splitdns_domain::{DnsRequest, DomainError};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Terminal stage: answers nothing.
///
/// Ends the chain when no upstream is configured, so that queries the
/// custom DNS stage passes on come back as an empty `NOTRESOLVED` response.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUpstreamResolver;

#[async_trait]
impl DnsResolver for NoUpstreamResolver {
    async fn resolve(
        &self,
        request: &DnsRequest,
        cancel: &CancellationToken,
    ) -> Result<DnsResponse, DomainError> {
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        trace!(domain = %request.query.domain, "No upstream configured");
        Ok(DnsResponse::new(
            Vec::new(),
            ResponseKind::NotResolved,
            "NO UPSTREAM",
        ))
    }

    fn name(&self) -> &'static str {
        "no_upstream"
    }
}

use async_trait::async_trait;
use splitdns_application::ports::{DnsResolver, DnsResponse, ResponseKind};
use splitdns_domain::{DnsRequest, DomainError, RecordType, ResourceRecord};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// What the next resolver was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub domain: String,
    pub record_type: RecordType,
    pub client_ip: Option<IpAddr>,
    pub client_name: Option<String>,
}

/// Next stage of the chain that records every call.
///
/// Answers with the records registered for the queried domain, or with an
/// empty `RESOLVED` response.
#[derive(Clone, Default)]
pub struct MockNextResolver {
    responses: Arc<RwLock<HashMap<String, Vec<ResourceRecord>>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    should_fail: Arc<RwLock<bool>>,
    cancel_on_call: Arc<RwLock<bool>>,
}

impl MockNextResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_response(&self, domain: &str, answers: Vec<ResourceRecord>) {
        self.responses
            .write()
            .await
            .insert(domain.to_ascii_lowercase(), answers);
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    /// Cancel the caller's token from inside `resolve`, then answer normally.
    pub async fn set_cancel_on_call(&self, cancel_on_call: bool) {
        *self.cancel_on_call.write().await = cancel_on_call;
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl DnsResolver for MockNextResolver {
    async fn resolve(
        &self,
        request: &DnsRequest,
        cancel: &CancellationToken,
    ) -> Result<DnsResponse, DomainError> {
        self.calls.write().await.push(RecordedCall {
            domain: request.query.domain.to_string(),
            record_type: request.query.record_type,
            client_ip: request.client_ip,
            client_name: request.client_name.as_deref().map(str::to_string),
        });

        if *self.cancel_on_call.read().await {
            cancel.cancel();
        }

        if *self.should_fail.read().await {
            return Err(DomainError::Upstream("mock upstream failed".to_string()));
        }

        let key = request
            .query
            .domain
            .trim_end_matches('.')
            .to_ascii_lowercase();
        let answers = self
            .responses
            .read()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default();

        Ok(DnsResponse::new(answers, ResponseKind::Resolved, "RESOLVED"))
    }

    fn name(&self) -> &'static str {
        "mock_next"
    }
}

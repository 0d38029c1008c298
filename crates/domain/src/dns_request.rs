use super::{DnsQuery, RecordType};
use std::net::IpAddr;
use std::sync::Arc;

/// A query together with the identity of the client that asked it.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    /// Source address; absent when the transport could not provide one.
    pub client_ip: Option<IpAddr>,
    /// Display name of the client (hostname, DoH client id, ...).
    pub client_name: Option<Arc<str>>,
    pub query: DnsQuery,
}

impl DnsRequest {
    pub fn new(query: DnsQuery) -> Self {
        Self {
            client_ip: None,
            client_name: None,
            query,
        }
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    pub fn with_client_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Sub-request for the same client with a different question.
    pub fn derive(&self, domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            client_ip: self.client_ip,
            client_name: self.client_name.clone(),
            query: DnsQuery::new(domain, record_type),
        }
    }
}

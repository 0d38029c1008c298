use crate::helpers::MockNextResolver;
use splitdns_domain::{Config, DnsQuery, DnsRequest, RecordData, RecordType, ResourceRecord};
use splitdns_infrastructure::dns::CustomDnsResolver;
use std::sync::Arc;

/// Custom DNS stage built from a TOML document, in front of `next`.
pub fn custom_dns(toml: &str, next: &MockNextResolver) -> CustomDnsResolver {
    let config = Config::from_toml_str(toml, None).expect("valid configuration");
    config.validate().expect("configuration passes validation");
    let compiled = config.compile_custom_dns().expect("configuration compiles");
    CustomDnsResolver::new(&compiled, Arc::new(next.clone()))
}

pub fn request(domain: &str, record_type: RecordType) -> DnsRequest {
    DnsRequest::new(DnsQuery::new(domain, record_type))
}

pub fn request_from(client_ip: &str, domain: &str, record_type: RecordType) -> DnsRequest {
    request(domain, record_type).with_client_ip(client_ip.parse().expect("valid client address"))
}

pub fn a(name: &str, ttl: u32, ip: &str) -> ResourceRecord {
    ResourceRecord::new(name, ttl, RecordData::A(ip.parse().expect("valid IPv4 address")))
}

//! Splitdns Domain Layer
pub mod client_group;
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod dns_request;
pub mod errors;
pub mod zone;

pub use client_group::{ClientGroupKey, GlobPattern, DEFAULT_GROUP};
pub use config::{
    CliOverrides, CompiledCustomDns, CompiledGroup, Config, ConfigError, CustomDnsConfig,
    GroupMode, RewriteRule,
};
pub use dns_query::DnsQuery;
pub use dns_record::{DomainRecordSet, RecordData, RecordType, ResourceRecord};
pub use dns_request::DnsRequest;
pub use errors::DomainError;
pub use zone::{ZoneCompiler, ZoneParseError};

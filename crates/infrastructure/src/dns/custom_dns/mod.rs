//! Split-horizon custom DNS stage.
//!
//! Answers queries from locally configured records, selected per client
//! group, before the rest of the chain is consulted:
//!
//! - `group_store`: per-group merged record sets and rewriters
//! - `reverse_index`: PTR answers derived from every address record
//! - `processor`: suffix matching and per-record answer synthesis
//! - `answer`: owner-name validation for synthesized answers
//! - `resolver`: the orchestrating [`DnsResolver`] stage
//!
//! Everything here is built once from a [`CompiledCustomDns`] and only read
//! afterwards.
//!
//! [`DnsResolver`]: splitdns_application::ports::DnsResolver
//! [`CompiledCustomDns`]: splitdns_domain::CompiledCustomDns

mod answer;
mod group_store;
mod processor;
mod resolver;
mod reverse_index;

pub use processor::MAX_ALIAS_DEPTH;
pub use resolver::CustomDnsResolver;

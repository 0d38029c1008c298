use super::group_store::GroupStore;
use compact_str::CompactString;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use splitdns_domain::dns_record::{normalize_domain, reverse_name};
use std::sync::Arc;
use tracing::debug;

type Domains = SmallVec<[Arc<str>; 2]>;

/// Reverse-lookup name to the forward domains whose address records
/// produced it, across every client group.
#[derive(Debug, Default)]
pub struct ReverseIndex {
    entries: FxHashMap<CompactString, Domains>,
}

impl ReverseIndex {
    /// Scans groups in declaration order, records in declaration order.
    pub fn build(store: &GroupStore) -> Self {
        let mut entries: FxHashMap<CompactString, Domains> = FxHashMap::default();

        for group in store.iter() {
            for entry in group.records.iter() {
                for record in &entry.records {
                    let Some(ip) = record.data.address() else {
                        continue;
                    };
                    let domains = entries.entry(CompactString::new(reverse_name(ip))).or_default();
                    if !domains
                        .iter()
                        .any(|d| d.eq_ignore_ascii_case(&entry.domain))
                    {
                        domains.push(Arc::clone(&entry.domain));
                    }
                }
            }
        }

        debug!(addresses = entries.len(), "Reverse lookup index built");
        Self { entries }
    }

    /// Domains for a reverse-lookup name (`4.3.2.1.in-addr.arpa[.]`).
    pub fn lookup(&self, name: &str) -> Option<&[Arc<str>]> {
        self.entries
            .get(normalize_domain(name).as_str())
            .map(|domains| domains.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

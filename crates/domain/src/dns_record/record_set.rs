use super::name::normalize_domain;
use super::ResourceRecord;
use compact_str::CompactString;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Records configured for one domain, in declaration order.
#[derive(Debug, Clone)]
pub struct DomainEntry {
    /// Domain as declared (case preserved, no trailing dot).
    pub domain: Arc<str>,
    pub records: Vec<ResourceRecord>,
}

/// Mapping from domain to its ordered records.
///
/// Domains are matched case-insensitively; both the order of domains and
/// the order of records under a domain are preserved, since answers and
/// reverse-lookup results are emitted in that order.
#[derive(Debug, Clone, Default)]
pub struct DomainRecordSet {
    entries: Vec<DomainEntry>,
    index: FxHashMap<CompactString, usize>,
}

impl DomainRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record under `domain`, creating the entry on first use.
    pub fn push(&mut self, domain: &str, record: ResourceRecord) {
        let key = CompactString::new(normalize_domain(domain));
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].records.push(record),
            None => {
                let declared = domain.trim().trim_end_matches('.');
                self.index.insert(key, self.entries.len());
                self.entries.push(DomainEntry {
                    domain: Arc::from(declared),
                    records: vec![record],
                });
            }
        }
    }

    /// Concatenates `other` after this set. Same-domain entries keep both
    /// sides, this set's records first.
    pub fn append(&mut self, other: &DomainRecordSet) {
        for entry in &other.entries {
            for record in &entry.records {
                self.push(&entry.domain, record.clone());
            }
        }
    }

    /// Looks up an already-normalized key (lower case, no trailing dot).
    pub fn get_normalized(&self, key: &str) -> Option<&[ResourceRecord]> {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].records.as_slice())
    }

    pub fn get(&self, domain: &str) -> Option<&[ResourceRecord]> {
        self.get_normalized(&normalize_domain(domain))
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.get(domain).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainEntry> {
        self.entries.iter()
    }

    /// Overwrites the TTL of every record.
    pub fn set_ttl(&mut self, ttl: u32) {
        for entry in &mut self.entries {
            for record in &mut entry.records {
                record.ttl = ttl;
            }
        }
    }

    /// Number of domains.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|e| e.records.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns_record::RecordData;

    fn a(name: &str, ip: &str) -> ResourceRecord {
        ResourceRecord::new(name, 60, RecordData::A(ip.parse().unwrap()))
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut set = DomainRecordSet::new();
        set.push("Printer.LAN", a("Printer.LAN", "192.168.178.3"));

        assert!(set.get("printer.lan.").is_some());
        assert_eq!(set.iter().next().unwrap().domain.as_ref(), "Printer.LAN");
    }

    #[test]
    fn test_append_keeps_both_sides_in_order() {
        let mut direct = DomainRecordSet::new();
        direct.push("host.lan", a("host.lan", "10.0.0.1"));

        let mut zone = DomainRecordSet::new();
        zone.push("host.lan.", a("host.lan.", "10.0.0.2"));
        zone.push("other.lan.", a("other.lan.", "10.0.0.3"));

        direct.append(&zone);

        let records = direct.get("host.lan").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data, RecordData::A("10.0.0.1".parse().unwrap()));
        assert_eq!(records[1].data, RecordData::A("10.0.0.2".parse().unwrap()));
        assert_eq!(direct.len(), 2);
    }

    #[test]
    fn test_set_ttl_overwrites_everything() {
        let mut set = DomainRecordSet::new();
        set.push("a.lan", a("a.lan", "10.0.0.1"));
        set.push("a.lan", a("a.lan", "10.0.0.2"));
        set.set_ttl(1800);

        assert!(set.get("a.lan").unwrap().iter().all(|r| r.ttl == 1800));
        assert_eq!(set.record_count(), 2);
    }
}

use rustc_hash::FxHashMap;
use splitdns_application::services::{DomainRewriter, GroupDesignator};
use splitdns_domain::{CompiledCustomDns, CompiledGroup, DomainRecordSet, GroupMode};
use std::sync::Arc;
use tracing::debug;

/// Records and rewrite rules served to one client group.
#[derive(Debug, Clone, Default)]
pub struct GroupConfig {
    pub name: Arc<str>,
    /// Direct mapping followed by zone records; a domain present in both
    /// keeps the records of each.
    pub records: DomainRecordSet,
    pub rewriter: DomainRewriter,
}

impl GroupConfig {
    fn from_compiled(group: &CompiledGroup) -> Self {
        let mut records = group.mapping.clone();
        records.append(&group.zone);

        debug!(
            group = %group.name,
            domains = records.len(),
            records = records.record_count(),
            rewrites = group.rewrite.len(),
            "Client group loaded"
        );

        Self {
            name: Arc::clone(&group.name),
            records,
            rewriter: DomainRewriter::new(&group.rewrite),
        }
    }
}

/// Per-group configuration, in declaration order.
#[derive(Debug, Default)]
pub struct GroupStore {
    legacy: bool,
    groups: Vec<GroupConfig>,
    index: FxHashMap<Arc<str>, usize>,
    empty: GroupConfig,
}

impl GroupStore {
    pub fn new(config: &CompiledCustomDns) -> Self {
        let legacy = matches!(config.mode, GroupMode::Legacy(_));
        let groups: Vec<GroupConfig> = config
            .groups()
            .iter()
            .map(GroupConfig::from_compiled)
            .collect();

        let index = if legacy {
            FxHashMap::default()
        } else {
            groups
                .iter()
                .enumerate()
                .map(|(slot, group)| (Arc::clone(&group.name), slot))
                .collect()
        };

        Self {
            legacy,
            groups,
            index,
            empty: GroupConfig::default(),
        }
    }

    /// Configuration for a designated group. Unknown groups, and a
    /// designator that does not fit the configured mode, get an empty one.
    pub fn config_for(&self, designator: &GroupDesignator) -> &GroupConfig {
        let slot = match designator {
            GroupDesignator::Legacy if self.legacy => Some(0),
            GroupDesignator::Named(name) if !self.legacy => self.index.get(name).copied(),
            _ => None,
        };
        slot.and_then(|slot| self.groups.get(slot))
            .unwrap_or(&self.empty)
    }

    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupConfig> {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitdns_domain::{Config, RecordData};

    fn store(text: &str) -> GroupStore {
        let config = Config::from_toml_str(text, None).unwrap();
        GroupStore::new(&config.compile_custom_dns().unwrap())
    }

    #[test]
    fn test_legacy_designator() {
        let store = store("[custom_dns.mapping]\n\"printer.lan\" = \"192.168.178.3\"\n");
        assert!(store.is_legacy());
        assert!(store.config_for(&GroupDesignator::Legacy).records.contains("printer.lan"));
        assert!(store
            .config_for(&GroupDesignator::Named("default".into()))
            .records
            .is_empty());
    }

    #[test]
    fn test_unknown_group_is_empty() {
        let store = store("[custom_dns.client_groups.laptop]\nmapping = { \"a.lan\" = \"10.0.0.1\" }\n");
        let config = store.config_for(&GroupDesignator::Named("phone".into()));
        assert!(config.records.is_empty());
        assert!(config.rewriter.is_empty());
    }

    #[test]
    fn test_mapping_and_zone_are_merged() {
        let store = store(
            "[custom_dns]\ncustom_ttl = 1800\n\
             [custom_dns.client_groups.default]\n\
             mapping = { \"host.lan\" = \"10.0.0.1\" }\n\
             zone = \"host.lan. 60 TXT hello\"\n",
        );
        let records = store
            .config_for(&GroupDesignator::Named("default".into()))
            .records
            .get("host.lan")
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data, RecordData::A("10.0.0.1".parse().unwrap()));
        assert_eq!(records[0].ttl, 1800);
        assert_eq!(records[1].type_name(), "TXT");
        assert_eq!(records[1].ttl, 60);
    }
}

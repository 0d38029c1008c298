use super::custom_dns::{rewrite_rules, AddressList, CustomDnsConfig, RewriteRule, ZoneBlobs};
use super::errors::ConfigError;
use super::ordered::OrderedMap;
use crate::client_group::ClientGroupKey;
use crate::dns_record::{fqdn, DomainRecordSet, RecordData, ResourceRecord};
use crate::zone::ZoneCompiler;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Load-time compiled custom DNS configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct CompiledCustomDns {
    pub ttl: u32,
    pub filter_unmapped_types: bool,
    pub mode: GroupMode,
}

#[derive(Debug, Clone)]
pub enum GroupMode {
    /// No client groups: a single global mapping.
    Legacy(CompiledGroup),
    /// Client groups in declaration order, `default` always present.
    Groups(Vec<CompiledGroup>),
}

#[derive(Debug, Clone)]
pub struct CompiledGroup {
    pub name: Arc<str>,
    pub key: ClientGroupKey,
    /// Direct mapping, every record carrying the configured custom TTL.
    pub mapping: DomainRecordSet,
    /// Zone-derived records, TTLs as declared in the zone.
    pub zone: DomainRecordSet,
    pub rewrite: Vec<RewriteRule>,
}

impl CompiledCustomDns {
    /// Migrates, validates and compiles `config`. Relative `$INCLUDE` paths
    /// are resolved against `base_dir`.
    pub fn compile(
        config: &CustomDnsConfig,
        base_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::Validation)?;

        let ttl = config.custom_ttl;
        let compiler = match base_dir {
            Some(dir) => ZoneCompiler::new().with_base_dir(dir),
            None => ZoneCompiler::new(),
        };

        let (normalized, _) = config.clone().migrate();

        let mode = if normalized.client_groups.is_empty() {
            GroupMode::Legacy(compile_group(
                "",
                ClientGroupKey::Default,
                &normalized.mapping,
                &normalized.rewrite,
                &normalized.zone,
                ttl,
                &compiler,
            )?)
        } else {
            let mut groups = Vec::with_capacity(normalized.client_groups.len());
            for (name, group) in normalized.client_groups.iter() {
                let key = ClientGroupKey::parse(name).map_err(|e| {
                    ConfigError::Validation(format!("invalid client group name '{}': {}", name, e))
                })?;
                groups.push(compile_group(
                    name,
                    key,
                    &group.mapping,
                    &group.rewrite,
                    &group.zone,
                    ttl,
                    &compiler,
                )?);
            }
            info!(groups = groups.len(), "Custom DNS client groups compiled");
            GroupMode::Groups(groups)
        };

        Ok(Self {
            ttl,
            filter_unmapped_types: config.filter_unmapped_types,
            mode,
        })
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self.mode, GroupMode::Legacy(_))
    }

    pub fn groups(&self) -> &[CompiledGroup] {
        match &self.mode {
            GroupMode::Legacy(group) => std::slice::from_ref(group),
            GroupMode::Groups(groups) => groups,
        }
    }
}

fn compile_group(
    name: &str,
    key: ClientGroupKey,
    mapping: &OrderedMap<AddressList>,
    rewrite: &OrderedMap<String>,
    zone: &ZoneBlobs,
    ttl: u32,
    compiler: &ZoneCompiler,
) -> Result<CompiledGroup, ConfigError> {
    let mut direct = DomainRecordSet::new();
    for (domain, addresses) in mapping.iter() {
        let owner = fqdn(domain.trim());
        for ip in &addresses.0 {
            direct.push(domain, ResourceRecord::new(owner.as_str(), ttl, RecordData::from_ip(*ip)));
        }
    }

    let mut zone_records = DomainRecordSet::new();
    for blob in zone.iter() {
        let compiled = compiler.compile(blob).map_err(|source| ConfigError::Zone {
            group: group_label(name),
            source,
        })?;
        zone_records.append(&compiled);
    }

    Ok(CompiledGroup {
        name: Arc::from(name),
        key,
        mapping: direct,
        zone: zone_records,
        rewrite: rewrite_rules(rewrite),
    })
}

fn group_label(name: &str) -> String {
    if name.is_empty() {
        "custom_dns".to_string()
    } else {
        format!("client_groups.{}", name)
    }
}

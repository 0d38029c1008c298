use super::ordered::OrderedMap;
use crate::client_group::{ClientGroupKey, DEFAULT_GROUP};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Custom DNS configuration: locally defined answers, optionally split per
/// client group.
///
/// ```toml
/// [custom_dns]
/// custom_ttl = "1h"
/// filter_unmapped_types = true
///
/// [custom_dns.client_groups."192.168.1.0/24"]
/// mapping = { "printer.lan" = "192.168.1.3" }
/// rewrite = { "home" = "lan" }
/// ```
///
/// The top-level `mapping`, `rewrite` and `zone` keys are the legacy,
/// pre-client-group form. They are still served as-is when no client group
/// is configured, and folded into the `default` group by [`migrate`] when
/// one is.
///
/// [`migrate`]: CustomDnsConfig::migrate
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomDnsConfig {
    /// TTL for `mapping` answers, in seconds or `"<n>s|m|h|d"` (default 1h).
    /// Zone records keep the TTL declared in the zone.
    #[serde(
        default = "default_custom_ttl",
        deserialize_with = "deserialize_ttl"
    )]
    pub custom_ttl: u32,

    /// When a mapped domain has no record of the queried type, answer
    /// NOERROR with no data instead of asking the next resolver.
    #[serde(default = "default_true")]
    pub filter_unmapped_types: bool,

    #[serde(default)]
    pub client_groups: OrderedMap<CustomDnsGroup>,

    // Legacy single-mapping fields
    #[serde(default)]
    pub mapping: OrderedMap<AddressList>,

    #[serde(default)]
    pub rewrite: OrderedMap<String>,

    #[serde(default)]
    pub zone: ZoneBlobs,
}

/// Configuration of a single client group.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CustomDnsGroup {
    #[serde(default)]
    pub mapping: OrderedMap<AddressList>,

    #[serde(default)]
    pub rewrite: OrderedMap<String>,

    #[serde(default)]
    pub zone: ZoneBlobs,
}

impl CustomDnsGroup {
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty() && self.rewrite.is_empty() && self.zone.is_empty()
    }

    fn absorb(&mut self, legacy: CustomDnsGroup) {
        for (domain, addresses) in legacy.mapping {
            self.mapping.insert(domain, addresses);
        }
        for (from, to) in legacy.rewrite {
            self.rewrite.insert(from, to);
        }
        self.zone.0.extend(legacy.zone.0);
    }
}

/// One rewrite rule: every occurrence of `from` in the query domain is
/// replaced by `to`. Matching is literal substring containment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pub from: Arc<str>,
    pub to: Arc<str>,
}

impl RewriteRule {
    pub fn new(from: impl Into<Arc<str>>, to: impl Into<Arc<str>>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Addresses of a mapping entry, written as `"10.0.0.1, 2001:db8::1"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressList(pub Vec<IpAddr>);

impl AddressList {
    pub fn parse(raw: &str) -> Result<Self, String> {
        raw.split(',')
            .map(str::trim)
            .map(|part| {
                part.parse::<IpAddr>()
                    .map_err(|_| format!("invalid IP address '{}'", part))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(AddressList)
    }
}

impl fmt::Display for AddressList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(IpAddr::to_string).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl Serialize for AddressList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AddressList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        AddressList::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Zone-file text; a single string or a list of independent zone blobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneBlobs(pub Vec<String>);

impl ZoneBlobs {
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|blob| blob.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Serialize for ZoneBlobs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [single] => serializer.serialize_str(single),
            many => many.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ZoneBlobs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(blob) => ZoneBlobs(vec![blob]),
            OneOrMany::Many(blobs) => ZoneBlobs(blobs),
        })
    }
}

impl Default for CustomDnsConfig {
    fn default() -> Self {
        Self {
            custom_ttl: default_custom_ttl(),
            filter_unmapped_types: true,
            client_groups: OrderedMap::new(),
            mapping: OrderedMap::new(),
            rewrite: OrderedMap::new(),
            zone: ZoneBlobs::default(),
        }
    }
}

impl CustomDnsConfig {
    /// The stage has something to answer.
    pub fn is_enabled(&self) -> bool {
        !self.mapping.is_empty() || !self.zone.is_empty() || !self.client_groups.is_empty()
    }

    pub fn has_legacy_fields(&self) -> bool {
        !self.mapping.is_empty() || !self.rewrite.is_empty() || !self.zone.is_empty()
    }

    /// Folds legacy top-level fields into the `default` client group.
    ///
    /// Only happens when client groups are configured as well; a purely
    /// legacy configuration is returned untouched. Whenever client groups
    /// exist the result always contains a `default` group. The flag reports
    /// whether legacy fields were moved.
    pub fn migrate(self) -> (CustomDnsConfig, bool) {
        let CustomDnsConfig {
            custom_ttl,
            filter_unmapped_types,
            mut client_groups,
            mapping,
            rewrite,
            zone,
        } = self;

        if client_groups.is_empty() {
            let untouched = CustomDnsConfig {
                custom_ttl,
                filter_unmapped_types,
                client_groups,
                mapping,
                rewrite,
                zone,
            };
            return (untouched, false);
        }

        let legacy = CustomDnsGroup {
            mapping,
            rewrite,
            zone,
        };
        let migrated = !legacy.is_empty();

        if migrated {
            warn!(
                mapping = legacy.mapping.len(),
                rewrite = legacy.rewrite.len(),
                zone = !legacy.zone.is_empty(),
                "Migrating legacy custom DNS fields into client group 'default'; \
                 move top-level 'mapping', 'rewrite' and 'zone' under 'client_groups.default'"
            );
        }

        match client_groups.get_mut(DEFAULT_GROUP) {
            Some(default_group) => default_group.absorb(legacy),
            None => client_groups.insert(DEFAULT_GROUP, legacy),
        }

        let normalized = CustomDnsConfig {
            custom_ttl,
            filter_unmapped_types,
            client_groups,
            mapping: OrderedMap::new(),
            rewrite: OrderedMap::new(),
            zone: ZoneBlobs::default(),
        };
        (normalized, migrated)
    }

    /// Checks every client group key (CIDR, glob) before anything is built.
    pub fn validate(&self) -> Result<(), String> {
        for key in self.client_groups.keys() {
            ClientGroupKey::parse(key)
                .map_err(|e| format!("invalid client group name '{}': {}", key, e))?;
        }
        Ok(())
    }

    /// Emits the effective configuration, as loaded (before migration).
    pub fn log_config(&self) {
        debug!(ttl = self.custom_ttl, "custom DNS TTL");
        debug!(
            filter_unmapped_types = self.filter_unmapped_types,
            "custom DNS unmapped type filtering"
        );

        if !self.client_groups.is_empty() {
            info!(groups = self.client_groups.len(), "Client groups configured");
            for (name, group) in self.client_groups.iter() {
                for (domain, addresses) in group.mapping.iter() {
                    info!(group = %name, domain = %domain, addresses = %addresses, "mapping");
                }
                for (from, to) in group.rewrite.iter() {
                    info!(group = %name, from = %from, to = %to, "rewrite");
                }
                if !group.zone.is_empty() {
                    info!(group = %name, blobs = group.zone.0.len(), "zone");
                }
            }
        }

        for (domain, addresses) in self.mapping.iter() {
            info!(domain = %domain, addresses = %addresses, "mapping (deprecated, use client_groups)");
        }
        for (from, to) in self.rewrite.iter() {
            info!(from = %from, to = %to, "rewrite (deprecated, use client_groups)");
        }
    }
}

pub(crate) fn rewrite_rules(rules: &OrderedMap<String>) -> Vec<RewriteRule> {
    rules
        .iter()
        .map(|(from, to)| RewriteRule::new(from, to.as_str()))
        .collect()
}

fn default_custom_ttl() -> u32 {
    3600
}

fn default_true() -> bool {
    true
}

fn deserialize_ttl<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTtl {
        Seconds(u64),
        Text(String),
    }

    match RawTtl::deserialize(deserializer)? {
        RawTtl::Seconds(secs) => u32::try_from(secs)
            .map_err(|_| serde::de::Error::custom(format!("TTL {} out of range", secs))),
        RawTtl::Text(text) => crate::zone::parse_ttl(text.trim())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid TTL '{}'", text))),
    }
}

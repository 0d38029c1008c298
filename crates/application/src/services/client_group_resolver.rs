use ipnetwork::IpNetwork;
use rustc_hash::FxHashMap;
use splitdns_domain::{ClientGroupKey, CompiledCustomDns, GroupMode, DEFAULT_GROUP};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of client group selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupDesignator {
    /// No client groups configured: the single global mapping applies.
    Legacy,
    Named(Arc<str>),
}

impl GroupDesignator {
    pub fn name(&self) -> Option<&str> {
        match self {
            GroupDesignator::Legacy => None,
            GroupDesignator::Named(name) => Some(name),
        }
    }
}

/// Selects the client group a request belongs to.
///
/// Tiers, first match wins:
/// 1. a group keyed by the client's exact address
/// 2. a client-name glob or literal name, in declaration order
/// 3. the most specific subnet containing the client address
/// 4. `default`
pub struct ClientGroupResolver {
    legacy: bool,
    addresses: FxHashMap<IpAddr, Arc<str>>,
    names: Vec<(ClientGroupKey, Arc<str>)>,
    subnets: Vec<(IpNetwork, Arc<str>)>,
    default_group: Arc<str>,
}

impl ClientGroupResolver {
    /// Builds the tiers from classified group keys, in declaration order.
    pub fn new<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = (Arc<str>, ClientGroupKey)>,
    {
        let mut resolver = Self::legacy();
        for (name, key) in groups {
            resolver.legacy = false;
            match key {
                ClientGroupKey::Default => resolver.default_group = name,
                ClientGroupKey::Address(ip) => {
                    resolver.addresses.entry(ip).or_insert(name);
                }
                ClientGroupKey::Subnet(network) => resolver.subnets.push((network, name)),
                key @ (ClientGroupKey::Pattern(_) | ClientGroupKey::Name(_)) => {
                    resolver.names.push((key, name))
                }
            }
        }

        debug!(
            addresses = resolver.addresses.len(),
            names = resolver.names.len(),
            subnets = resolver.subnets.len(),
            legacy = resolver.legacy,
            "Client group resolver ready"
        );
        resolver
    }

    /// Resolver for a configuration without client groups.
    pub fn legacy() -> Self {
        Self {
            legacy: true,
            addresses: FxHashMap::default(),
            names: Vec::new(),
            subnets: Vec::new(),
            default_group: Arc::from(DEFAULT_GROUP),
        }
    }

    pub fn from_compiled(config: &CompiledCustomDns) -> Self {
        match &config.mode {
            GroupMode::Legacy(_) => Self::legacy(),
            GroupMode::Groups(groups) => Self::new(
                groups
                    .iter()
                    .map(|group| (Arc::clone(&group.name), group.key.clone())),
            ),
        }
    }

    pub fn resolve(&self, client_ip: Option<IpAddr>, client_name: Option<&str>) -> GroupDesignator {
        if self.legacy {
            return GroupDesignator::Legacy;
        }

        if let Some(name) = client_ip.and_then(|ip| self.addresses.get(&ip)) {
            trace!(group = %name, "client matched by address");
            return GroupDesignator::Named(Arc::clone(name));
        }

        if let Some(client_name) = client_name.filter(|n| !n.is_empty()) {
            if let Some((_, name)) = self
                .names
                .iter()
                .find(|(key, _)| key.matches_client_name(client_name))
            {
                trace!(group = %name, client = %client_name, "client matched by name");
                return GroupDesignator::Named(Arc::clone(name));
            }
        }

        if let Some(name) = client_ip.and_then(|ip| self.find_subnet(ip)) {
            trace!(group = %name, "client matched by subnet");
            return GroupDesignator::Named(Arc::clone(name));
        }

        GroupDesignator::Named(Arc::clone(&self.default_group))
    }

    /// Longest prefix among all subnets containing `ip`.
    fn find_subnet(&self, ip: IpAddr) -> Option<&Arc<str>> {
        let mut best_match: Option<(u8, &Arc<str>)> = None;

        for (network, name) in &self.subnets {
            if network.contains(ip) {
                let prefix = network.prefix();

                match best_match {
                    None => best_match = Some((prefix, name)),
                    Some((existing_prefix, _)) if prefix > existing_prefix => {
                        best_match = Some((prefix, name));
                    }
                    _ => {}
                }
            }
        }

        best_match.map(|(_, name)| name)
    }
}

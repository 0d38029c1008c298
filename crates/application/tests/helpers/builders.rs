use splitdns_application::services::ClientGroupResolver;
use splitdns_domain::ClientGroupKey;
use std::net::IpAddr;
use std::sync::Arc;

/// Resolver over group keys in the given declaration order.
pub fn groups_from(keys: &[&str]) -> ClientGroupResolver {
    ClientGroupResolver::new(keys.iter().map(|key| {
        (
            Arc::from(*key),
            ClientGroupKey::parse(key).expect("valid group key"),
        )
    }))
}

pub fn client(ip: &str) -> Option<IpAddr> {
    Some(ip.parse().expect("valid client address"))
}

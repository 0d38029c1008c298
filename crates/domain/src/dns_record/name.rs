//! Domain name helpers shared by the zone compiler, the record store and
//! the reverse lookup index.

use std::net::IpAddr;

/// Lower-cases a domain and strips the trailing root label.
///
/// This is the key form used by every `DomainRecordSet`.
pub fn normalize_domain(domain: &str) -> String {
    trim_root(domain.trim()).to_ascii_lowercase()
}

/// Strips a single trailing `.` if present.
pub fn trim_root(domain: &str) -> &str {
    domain.strip_suffix('.').unwrap_or(domain)
}

/// Returns the fully-qualified form (trailing `.`) of a domain.
pub fn fqdn(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

/// Drops the left-most label, `None` once the name is exhausted.
pub fn parent_domain(domain: &str) -> Option<&str> {
    domain.find('.').map(|i| &domain[i + 1..])
}

/// Builds the reverse-lookup name of an address (RFC 1035 `in-addr.arpa`,
/// RFC 3596 `ip6.arpa`), normalized (no trailing dot, lower case).
pub fn reverse_name(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            format!("{}.{}.{}.{}.in-addr.arpa", o[3], o[2], o[1], o[0])
        }
        IpAddr::V6(v6) => {
            let mut out = String::with_capacity(72);
            for byte in v6.octets().iter().rev() {
                out.push_str(&format!("{:x}.{:x}.", byte & 0x0f, byte >> 4));
            }
            out.push_str("ip6.arpa");
            out
        }
    }
}

use fancy_regex::Regex;
use ipnetwork::IpNetwork;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/// Name of the fallback group every group-based configuration carries.
pub const DEFAULT_GROUP: &str = "default";

/// How a client group key selects clients.
///
/// Keys are classified once when the configuration is validated:
/// `default`, a literal address, a CIDR (`a.b.c.d/n`), a glob containing
/// `*`, `?` or `[`, and otherwise a literal client name.
#[derive(Debug, Clone)]
pub enum ClientGroupKey {
    Default,
    Address(IpAddr),
    Subnet(IpNetwork),
    Pattern(GlobPattern),
    Name(Arc<str>),
}

impl ClientGroupKey {
    pub fn parse(key: &str) -> Result<Self, String> {
        if key == DEFAULT_GROUP {
            return Ok(ClientGroupKey::Default);
        }

        if let Ok(ip) = key.parse::<IpAddr>() {
            return Ok(ClientGroupKey::Address(ip));
        }

        if key.contains('/') {
            let network: IpNetwork = key
                .parse()
                .map_err(|e| format!("invalid CIDR notation: {}", e))?;
            let max = if network.is_ipv4() { 32 } else { 128 };
            if network.prefix() > max {
                return Err(format!(
                    "CIDR prefix length cannot exceed {} in '{}'",
                    max, key
                ));
            }
            return Ok(ClientGroupKey::Subnet(network));
        }

        if GlobPattern::is_glob(key) {
            return GlobPattern::new(key)
                .map(ClientGroupKey::Pattern)
                .map_err(|e| format!("invalid wildcard pattern: {}", e));
        }

        Ok(ClientGroupKey::Name(Arc::from(key)))
    }

    /// True when `name` selects this group by client name (tier 2).
    pub fn matches_client_name(&self, name: &str) -> bool {
        match self {
            ClientGroupKey::Pattern(glob) => glob.is_match(name),
            ClientGroupKey::Name(literal) => literal.eq_ignore_ascii_case(name),
            _ => false,
        }
    }
}

/// Shell-style glob (`*`, `?`, `[...]`, `\` escapes) compiled to an
/// anchored, ASCII case-insensitive regex.
#[derive(Clone)]
pub struct GlobPattern {
    source: Arc<str>,
    regex: Regex,
}

impl GlobPattern {
    pub fn is_glob(pattern: &str) -> bool {
        pattern.contains(['*', '?', '['])
    }

    pub fn new(pattern: &str) -> Result<Self, String> {
        let translated = translate_glob(pattern)?;
        let regex = Regex::new(&translated).map_err(|e| e.to_string())?;
        Ok(Self {
            source: Arc::from(pattern),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate).unwrap_or(false)
    }
}

impl fmt::Debug for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GlobPattern").field(&self.source).finish()
    }
}

fn translate_glob(pattern: &str) -> Result<String, String> {
    let mut out = String::with_capacity(pattern.len() * 2 + 8);
    out.push_str("(?i)^");

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| "trailing escape character".to_string())?;
                out.push_str(&fancy_regex::escape(&escaped.to_string()));
            }
            '[' => {
                out.push('[');
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                    out.push('^');
                }

                let mut members = 0usize;
                let mut closed = false;
                while let Some(m) = chars.next() {
                    match m {
                        ']' if members > 0 => {
                            closed = true;
                            break;
                        }
                        '\\' => {
                            let escaped = chars
                                .next()
                                .ok_or_else(|| "trailing escape character".to_string())?;
                            out.push_str(&fancy_regex::escape(&escaped.to_string()));
                        }
                        '-' if members > 0 && chars.peek().is_some_and(|n| *n != ']') => {
                            out.push('-')
                        }
                        '[' | ']' | '^' | '&' | '~' | '-' => {
                            out.push('\\');
                            out.push(m);
                        }
                        _ => out.push(m),
                    }
                    members += 1;
                }

                if !closed {
                    return Err("syntax error in pattern: unterminated '['".to_string());
                }
                out.push(']');
            }
            _ => out.push_str(&fancy_regex::escape(&c.to_string())),
        }
    }

    out.push('$');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_keys() {
        assert!(matches!(
            ClientGroupKey::parse("default").unwrap(),
            ClientGroupKey::Default
        ));
        assert!(matches!(
            ClientGroupKey::parse("192.168.1.10").unwrap(),
            ClientGroupKey::Address(_)
        ));
        assert!(matches!(
            ClientGroupKey::parse("fd00::/8").unwrap(),
            ClientGroupKey::Subnet(_)
        ));
        assert!(matches!(
            ClientGroupKey::parse("laptop*").unwrap(),
            ClientGroupKey::Pattern(_)
        ));
        assert!(matches!(
            ClientGroupKey::parse("kitchen-tablet").unwrap(),
            ClientGroupKey::Name(_)
        ));
    }

    #[test]
    fn test_rejects_bad_cidr() {
        let err = ClientGroupKey::parse("192.168.1.0/33").unwrap_err();
        assert!(err.contains("invalid CIDR"));
        assert!(ClientGroupKey::parse("not-an-ip/24").is_err());
    }

    #[test]
    fn test_rejects_bad_glob() {
        let err = ClientGroupKey::parse("laptop[").unwrap_err();
        assert!(err.contains("invalid wildcard pattern"));
    }

    #[test]
    fn test_glob_star_and_question_mark() {
        let glob = GlobPattern::new("laptop-??").unwrap();
        assert!(glob.is_match("laptop-01"));
        assert!(glob.is_match("LAPTOP-02"));
        assert!(!glob.is_match("laptop-001"));

        let star = GlobPattern::new("*.iot").unwrap();
        assert!(star.is_match("cam.iot"));
        assert!(!star.is_match("cam.iot.lan"));
    }

    #[test]
    fn test_glob_character_classes() {
        let glob = GlobPattern::new("host[0-3]").unwrap();
        assert!(glob.is_match("host2"));
        assert!(!glob.is_match("host7"));

        let negated = GlobPattern::new("host[!0-3]").unwrap();
        assert!(negated.is_match("host7"));
        assert!(!negated.is_match("host2"));
    }

    #[test]
    fn test_escape_inside_class_is_literal() {
        let glob = GlobPattern::new("host[\\d]").unwrap();
        assert!(glob.is_match("hostd"));
        assert!(!glob.is_match("host5"));

        let glob = GlobPattern::new("a[\\w\\.]b").unwrap();
        assert!(glob.is_match("awb"));
        assert!(glob.is_match("a.b"));
        assert!(!glob.is_match("axb"));
    }

    #[test]
    fn test_glob_escapes_regex_metacharacters() {
        let glob = GlobPattern::new("a.b*").unwrap();
        assert!(glob.is_match("a.bc"));
        assert!(!glob.is_match("axbc"));
    }

    #[test]
    fn test_literal_name_matches_case_insensitively() {
        let key = ClientGroupKey::parse("Kitchen-Tablet").unwrap();
        assert!(key.matches_client_name("kitchen-tablet"));
        assert!(!key.matches_client_name("kitchen"));
    }
}

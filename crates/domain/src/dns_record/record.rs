use super::RecordType;
use compact_str::CompactString;
use smallvec::SmallVec;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// Character-strings of a TXT record, in declaration order.
pub type TxtStrings = SmallVec<[Arc<str>; 2]>;

/// Typed payload of a configured or synthesized record.
///
/// `Opaque` holds records the zone grammar accepts but the resolver has no
/// processor for (MX, NS, ...). They survive loading so the failure is
/// reported at query time against the exact record that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    TXT(TxtStrings),
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: Arc<str>,
    },
    CNAME(Arc<str>),
    PTR(Arc<str>),
    Opaque {
        mnemonic: CompactString,
        rdata: Arc<str>,
    },
}

impl RecordData {
    pub fn from_ip(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => RecordData::A(v4),
            IpAddr::V6(v6) => RecordData::AAAA(v6),
        }
    }

    /// Mnemonic of the record type (`"A"`, `"MX"`, ...).
    pub fn type_name(&self) -> &str {
        match self {
            RecordData::A(_) => RecordType::A.as_str(),
            RecordData::AAAA(_) => RecordType::AAAA.as_str(),
            RecordData::TXT(_) => RecordType::TXT.as_str(),
            RecordData::SRV { .. } => RecordType::SRV.as_str(),
            RecordData::CNAME(_) => RecordType::CNAME.as_str(),
            RecordData::PTR(_) => RecordType::PTR.as_str(),
            RecordData::Opaque { mnemonic, .. } => mnemonic.as_str(),
        }
    }

    pub fn address(&self) -> Option<IpAddr> {
        match self {
            RecordData::A(v4) => Some(IpAddr::V4(*v4)),
            RecordData::AAAA(v6) => Some(IpAddr::V6(*v6)),
            _ => None,
        }
    }
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::A(ip) => write!(f, "{ip}"),
            RecordData::AAAA(ip) => write!(f, "{ip}"),
            RecordData::TXT(strings) => {
                let quoted: Vec<String> = strings.iter().map(|s| format!("\"{s}\"")).collect();
                write!(f, "{}", quoted.join(" "))
            }
            RecordData::SRV {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{priority} {weight} {port} {target}"),
            RecordData::CNAME(target) | RecordData::PTR(target) => write!(f, "{target}"),
            RecordData::Opaque { rdata, .. } => write!(f, "{rdata}"),
        }
    }
}

/// A single resource record: owner name, TTL in seconds and typed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Arc<str>,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(name: impl Into<Arc<str>>, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.into(),
            ttl,
            data,
        }
    }

    pub fn type_name(&self) -> &str {
        self.data.type_name()
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\tIN\t{}\t{}",
            self.name,
            self.ttl,
            self.type_name(),
            self.data
        )
    }
}

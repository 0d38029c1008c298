use std::fmt;
use std::str::FromStr;

/// Query types the resolver can be asked about.
///
/// Only A, AAAA, CNAME, TXT, SRV and PTR are ever answered locally; the rest
/// exist so that such questions can be recognised, filtered and passed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    MX,
    TXT,
    AAAA,
    SRV,
    HTTPS,
    CAA,
}

/// (type, wire number, mnemonic)
static KNOWN: [(RecordType, u16, &str); 11] = [
    (RecordType::A, 1, "A"),
    (RecordType::NS, 2, "NS"),
    (RecordType::CNAME, 5, "CNAME"),
    (RecordType::SOA, 6, "SOA"),
    (RecordType::PTR, 12, "PTR"),
    (RecordType::MX, 15, "MX"),
    (RecordType::TXT, 16, "TXT"),
    (RecordType::AAAA, 28, "AAAA"),
    (RecordType::SRV, 33, "SRV"),
    (RecordType::HTTPS, 65, "HTTPS"),
    (RecordType::CAA, 257, "CAA"),
];

impl RecordType {
    fn entry(&self) -> &'static (RecordType, u16, &'static str) {
        let row = match self {
            RecordType::A => 0,
            RecordType::NS => 1,
            RecordType::CNAME => 2,
            RecordType::SOA => 3,
            RecordType::PTR => 4,
            RecordType::MX => 5,
            RecordType::TXT => 6,
            RecordType::AAAA => 7,
            RecordType::SRV => 8,
            RecordType::HTTPS => 9,
            RecordType::CAA => 10,
        };
        &KNOWN[row]
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().2
    }

    /// Wire type number (RFC 1035 and successors).
    pub fn to_u16(&self) -> u16 {
        self.entry().1
    }

    /// `None` for type numbers without a variant.
    pub fn from_u16(value: u16) -> Option<Self> {
        KNOWN
            .iter()
            .find(|(_, number, _)| *number == value)
            .map(|(rt, _, _)| *rt)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KNOWN
            .iter()
            .find(|(_, _, mnemonic)| mnemonic.eq_ignore_ascii_case(s))
            .map(|(rt, _, _)| *rt)
            .ok_or_else(|| format!("unknown record type '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(RecordType::from_str("aaaa").unwrap(), RecordType::AAAA);
        assert_eq!(RecordType::from_str("Srv").unwrap(), RecordType::SRV);
        assert!(RecordType::from_str("BOGUS").is_err());
    }

    #[test]
    fn test_every_variant_round_trips() {
        for (rt, number, mnemonic) in KNOWN {
            assert_eq!(rt.entry().0, rt);
            assert_eq!(RecordType::from_u16(number), Some(rt));
            assert_eq!(rt.to_u16(), number);
            assert_eq!(rt.to_string(), mnemonic);
        }
        assert_eq!(RecordType::from_u16(999), None);
    }
}

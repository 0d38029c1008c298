use super::tokenizer::{tokenize, LogicalLine, Token};
use super::ZoneParseError;
use crate::dns_record::{DomainRecordSet, RecordData, RecordType, ResourceRecord, TxtStrings};
use compact_str::CompactString;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

const INLINE_SOURCE: &str = "<inline>";
const MAX_INCLUDE_DEPTH: usize = 8;

/// Compiles zone-file text into a [`DomainRecordSet`] keyed by owner name.
#[derive(Debug, Clone, Default)]
pub struct ZoneCompiler {
    base_dir: Option<PathBuf>,
}

/// Parser state carried from line to line (and into `$INCLUDE`d files).
#[derive(Debug, Clone, Default)]
struct ParseState {
    origin: Option<String>,
    default_ttl: Option<u32>,
    last_ttl: Option<u32>,
    last_owner: Option<String>,
}

impl ZoneCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory relative `$INCLUDE` paths are resolved against (the
    /// configuration file's own directory).
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn compile(&self, text: &str) -> Result<DomainRecordSet, ZoneParseError> {
        let mut records = DomainRecordSet::new();
        let mut state = ParseState::default();
        self.compile_into(text, INLINE_SOURCE, &mut state, &mut records, 0)?;

        debug!(
            domains = records.len(),
            records = records.record_count(),
            "Zone compiled"
        );
        Ok(records)
    }

    fn compile_into(
        &self,
        text: &str,
        source: &str,
        state: &mut ParseState,
        out: &mut DomainRecordSet,
        depth: usize,
    ) -> Result<(), ZoneParseError> {
        for line in tokenize(text, source)? {
            let is_directive = !line.blank_owner
                && line
                    .tokens
                    .first()
                    .is_some_and(|t| !t.quoted && t.text.starts_with('$'));

            if is_directive {
                self.directive(&line, source, state, out, depth)?;
            } else {
                let (owner, record) = parse_record(&line, source, state)?;
                out.push(&owner, record);
            }
        }
        Ok(())
    }

    fn directive(
        &self,
        line: &LogicalLine,
        source: &str,
        state: &mut ParseState,
        out: &mut DomainRecordSet,
        depth: usize,
    ) -> Result<(), ZoneParseError> {
        let err = |msg: String| ZoneParseError::new(source, line.line, msg);
        let name = line.tokens[0].text.to_ascii_uppercase();
        let args = &line.tokens[1..];

        match name.as_str() {
            "$ORIGIN" => {
                let [origin] = args else {
                    return Err(err("$ORIGIN expects exactly one name".into()));
                };
                let qualified = qualify(&origin.text, state.origin.as_deref())
                    .ok_or_else(|| err(format!("bad origin name: {:?}", origin.text)))?;
                state.origin = Some(qualified);
            }
            "$TTL" => {
                let [ttl] = args else {
                    return Err(err("$TTL expects exactly one value".into()));
                };
                let ttl = parse_ttl(&ttl.text)
                    .ok_or_else(|| err(format!("bad TTL value: {:?}", ttl.text)))?;
                state.default_ttl = Some(ttl);
            }
            "$INCLUDE" => {
                if args.is_empty() || args.len() > 2 {
                    return Err(err("$INCLUDE expects a path and an optional origin".into()));
                }
                if depth + 1 > MAX_INCLUDE_DEPTH {
                    return Err(err(format!(
                        "$INCLUDE nested deeper than {MAX_INCLUDE_DEPTH} levels"
                    )));
                }

                let path = self.include_path(&args[0].text).ok_or_else(|| {
                    err(format!(
                        "relative $INCLUDE path {:?} without a configuration directory",
                        args[0].text
                    ))
                })?;
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    err(format!("failed to open $INCLUDE {}: {}", path.display(), e))
                })?;

                let mut child = state.clone();
                if let Some(origin) = args.get(1) {
                    child.origin = Some(
                        qualify(&origin.text, state.origin.as_deref())
                            .ok_or_else(|| err(format!("bad origin name: {:?}", origin.text)))?,
                    );
                }

                let included = path.display().to_string();
                self.compile_into(&text, &included, &mut child, out, depth + 1)?;
            }
            _ => return Err(err(format!("unknown directive {}", line.tokens[0].text))),
        }
        Ok(())
    }

    fn include_path(&self, raw: &str) -> Option<PathBuf> {
        let path = Path::new(raw);
        if path.is_absolute() {
            return Some(path.to_path_buf());
        }
        self.base_dir.as_ref().map(|base| base.join(path))
    }
}

fn parse_record(
    line: &LogicalLine,
    source: &str,
    state: &mut ParseState,
) -> Result<(String, ResourceRecord), ZoneParseError> {
    let err = |msg: String| ZoneParseError::new(source, line.line, msg);
    let mut tokens = line.tokens.iter().peekable();

    let owner = if line.blank_owner {
        state
            .last_owner
            .clone()
            .ok_or_else(|| err("missing owner name".into()))?
    } else {
        let raw = tokens.next().map(|t| t.text.as_str()).unwrap_or_default();
        qualify(raw, state.origin.as_deref()).ok_or_else(|| err(format!("bad owner name: {raw:?}")))?
    };

    let mut ttl: Option<u32> = None;
    let mut class_seen = false;
    let mnemonic = loop {
        let Some(token) = tokens.next() else {
            return Err(err("missing record type".into()));
        };
        if ttl.is_none() && token.text.starts_with(|c: char| c.is_ascii_digit()) {
            ttl = Some(
                parse_ttl(&token.text).ok_or_else(|| err(format!("bad TTL value: {:?}", token.text)))?,
            );
            continue;
        }
        if !class_seen && is_class(&token.text) {
            if !token.text.eq_ignore_ascii_case("IN") {
                return Err(err(format!("unsupported class {}", token.text)));
            }
            class_seen = true;
            continue;
        }
        break token.text.to_ascii_uppercase();
    };

    let ttl = ttl
        .or(state.default_ttl)
        .or(state.last_ttl)
        .ok_or_else(|| err("missing TTL with no previous value".into()))?;

    let rdata: Vec<&Token> = tokens.collect();
    let data = parse_rdata(&mnemonic, &rdata, state.origin.as_deref()).map_err(err)?;

    state.last_ttl = Some(ttl);
    state.last_owner = Some(owner.clone());

    let record = ResourceRecord::new(owner.as_str(), ttl, data);
    Ok((owner, record))
}

fn parse_rdata(mnemonic: &str, rdata: &[&Token], origin: Option<&str>) -> Result<RecordData, String> {
    let target = |raw: &str| -> Result<Arc<str>, String> {
        qualify(raw, origin)
            .map(Arc::from)
            .ok_or_else(|| format!("bad target name: {raw:?}"))
    };

    let rtype = RecordType::from_str(mnemonic).map_err(|_| format!("unknown RR type {mnemonic}"))?;

    match rtype {
        RecordType::A => {
            let raw = single(rdata, "A")?;
            Ipv4Addr::from_str(raw)
                .map(RecordData::A)
                .map_err(|_| format!("bad A address: {raw:?}"))
        }
        RecordType::AAAA => {
            let raw = single(rdata, "AAAA")?;
            Ipv6Addr::from_str(raw)
                .map(RecordData::AAAA)
                .map_err(|_| format!("bad AAAA address: {raw:?}"))
        }
        RecordType::CNAME => Ok(RecordData::CNAME(target(single(rdata, "CNAME")?)?)),
        RecordType::TXT => {
            if rdata.is_empty() {
                return Err("TXT record expects at least one string".into());
            }
            let strings: TxtStrings = rdata.iter().map(|t| Arc::from(t.text.as_str())).collect();
            Ok(RecordData::TXT(strings))
        }
        RecordType::SRV => {
            let [priority, weight, port, srv_target] = rdata else {
                return Err("SRV record expects priority, weight, port and target".into());
            };
            let num = |t: &Token| {
                t.text
                    .parse::<u16>()
                    .map_err(|_| format!("bad SRV field: {:?}", t.text))
            };
            Ok(RecordData::SRV {
                priority: num(*priority)?,
                weight: num(*weight)?,
                port: num(*port)?,
                target: target(&srv_target.text)?,
            })
        }
        other => {
            if rdata.is_empty() {
                return Err(format!("{other} record without data"));
            }
            let joined: Vec<&str> = rdata.iter().map(|t| t.text.as_str()).collect();
            Ok(RecordData::Opaque {
                mnemonic: CompactString::new(other.as_str()),
                rdata: Arc::from(joined.join(" ")),
            })
        }
    }
}

fn single<'a>(rdata: &[&'a Token], what: &str) -> Result<&'a str, String> {
    match rdata {
        [one] => Ok(one.text.as_str()),
        _ => Err(format!("{what} record expects exactly one value")),
    }
}

/// Makes `name` fully qualified against `origin`; `None` when a relative
/// name has no origin to complete it.
fn qualify(name: &str, origin: Option<&str>) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    if name == "@" {
        return origin.map(str::to_string);
    }
    if name.ends_with('.') {
        return Some(name.to_string());
    }
    let origin = origin?;
    if origin == "." {
        Some(format!("{name}."))
    } else {
        Some(format!("{name}.{origin}"))
    }
}

fn is_class(token: &str) -> bool {
    matches!(
        token.to_ascii_uppercase().as_str(),
        "IN" | "CH" | "HS" | "CS"
    )
}

/// Parses a TTL in plain seconds or BIND unit notation (`1h30m`, `2d`).
pub(crate) fn parse_ttl(raw: &str) -> Option<u32> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(secs) = raw.parse::<u32>() {
        return Some(secs);
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for c in raw.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let value: u64 = digits.parse().ok()?;
        digits.clear();
        let unit = match c.to_ascii_lowercase() {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            'w' => 604_800,
            _ => return None,
        };
        total = total.checked_add(value.checked_mul(unit)?)?;
    }
    if !digits.is_empty() {
        return None;
    }
    u32::try_from(total).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ttl_units() {
        assert_eq!(parse_ttl("3600"), Some(3600));
        assert_eq!(parse_ttl("1h"), Some(3600));
        assert_eq!(parse_ttl("1h30m"), Some(5400));
        assert_eq!(parse_ttl("2D"), Some(172_800));
        assert_eq!(parse_ttl("10x"), None);
        assert_eq!(parse_ttl("1h30"), None);
        assert_eq!(parse_ttl(""), None);
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("www", Some("example.com.")), Some("www.example.com.".into()));
        assert_eq!(qualify("@", Some("example.com.")), Some("example.com.".into()));
        assert_eq!(qualify("abs.example.", None), Some("abs.example.".into()));
        assert_eq!(qualify("www", None), None);
    }

    #[test]
    fn test_class_and_ttl_in_either_order() {
        let zone = ZoneCompiler::new()
            .compile("$ORIGIN lan.\na IN 60 A 10.0.0.1\nb 70 IN A 10.0.0.2")
            .unwrap();
        assert_eq!(zone.get("a.lan").unwrap()[0].ttl, 60);
        assert_eq!(zone.get("b.lan").unwrap()[0].ttl, 70);
    }

    #[test]
    fn test_previous_ttl_is_reused() {
        let zone = ZoneCompiler::new()
            .compile("$ORIGIN lan.\na 90 A 10.0.0.1\nb A 10.0.0.2")
            .unwrap();
        assert_eq!(zone.get("b.lan").unwrap()[0].ttl, 90);
    }

    #[test]
    fn test_opaque_record_is_kept() {
        let zone = ZoneCompiler::new()
            .compile("mx.domain. 60 MX 10 mail.domain.")
            .unwrap();
        let rr = &zone.get("mx.domain").unwrap()[0];
        assert_eq!(rr.type_name(), "MX");
        assert_eq!(rr.data.to_string(), "10 mail.domain.");
    }

    #[test]
    fn test_unknown_type_fails() {
        let err = ZoneCompiler::new()
            .compile("x.domain. 60 BOGUS data")
            .unwrap_err();
        assert!(err.message.contains("unknown RR type BOGUS"));
    }
}

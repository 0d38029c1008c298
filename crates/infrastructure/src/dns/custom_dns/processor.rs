use splitdns_domain::dns_record::{fqdn, parent_domain, trim_root};
use splitdns_domain::{DomainError, DomainRecordSet, RecordData, RecordType, ResourceRecord};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Alias hops followed for one top-level query before giving up.
pub const MAX_ALIAS_DEPTH: usize = 16;

/// What a stored record contributes to the answer of a query.
#[derive(Debug, PartialEq)]
pub(crate) enum Processed {
    Skip,
    Answer(ResourceRecord),
    /// The alias assertion itself, plus the target to resolve next (none
    /// for CNAME queries).
    Alias {
        record: ResourceRecord,
        follow: Option<Arc<str>>,
    },
}

/// Walks `domain` (normalized) towards the root, label by label, until an
/// entry exists. Cancellation is checked before every lookup.
pub(crate) fn find_entry<'a>(
    records: &'a DomainRecordSet,
    domain: &str,
    cancel: &CancellationToken,
) -> Result<Option<(&'a [ResourceRecord], usize)>, DomainError> {
    let mut current = domain;
    let mut stripped = 0usize;
    while !current.is_empty() {
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        if let Some(found) = records.get_normalized(current) {
            return Ok(Some((found, stripped)));
        }

        match parent_domain(current) {
            Some(parent) => {
                current = parent;
                stripped += 1;
            }
            None => break,
        }
    }
    Ok(None)
}

/// Synthesizes the answer a stored `record` gives to a `qtype` question.
/// Answers are owned by `owner`, the question name.
pub(crate) fn process_record(
    record: &ResourceRecord,
    owner: &Arc<str>,
    qtype: RecordType,
) -> Result<Processed, DomainError> {
    let answer = |data: RecordData| ResourceRecord::new(Arc::clone(owner), record.ttl, data);

    let processed = match &record.data {
        RecordData::A(_) if qtype == RecordType::A => Processed::Answer(answer(record.data.clone())),
        RecordData::AAAA(_) if qtype == RecordType::AAAA => {
            Processed::Answer(answer(record.data.clone()))
        }
        RecordData::TXT(_) if qtype == RecordType::TXT => Processed::Answer(answer(record.data.clone())),
        RecordData::SRV { .. } if qtype == RecordType::SRV => {
            Processed::Answer(answer(record.data.clone()))
        }
        RecordData::A(_) | RecordData::AAAA(_) | RecordData::TXT(_) | RecordData::SRV { .. } => {
            Processed::Skip
        }
        RecordData::CNAME(target) => {
            let alias = answer(RecordData::CNAME(Arc::from(fqdn(target))));
            let follow = (qtype != RecordType::CNAME).then(|| Arc::from(trim_root(target)));
            Processed::Alias {
                record: alias,
                follow,
            }
        }
        RecordData::PTR(_) | RecordData::Opaque { .. } => {
            return Err(DomainError::UnsupportedRecordType(
                record.type_name().to_string(),
            ))
        }
    };
    Ok(processed)
}

/// Extends the visited alias chain with `target`, by copy.
///
/// Fails when `target` was already visited or the chain is at its limit.
pub(crate) fn extend_chain(chain: &[Arc<str>], target: &Arc<str>) -> Result<Vec<Arc<str>>, DomainError> {
    let mut next: Vec<Arc<str>> = Vec::with_capacity(chain.len() + 1);
    next.extend(chain.iter().cloned());
    next.push(Arc::clone(target));

    if chain.iter().any(|seen| seen.eq_ignore_ascii_case(target)) {
        return Err(DomainError::AliasLoop(
            next.iter().map(|s| s.to_string()).collect(),
        ));
    }

    if chain.len() >= MAX_ALIAS_DEPTH {
        return Err(DomainError::AliasDepthExceeded {
            max: MAX_ALIAS_DEPTH,
            chain: next.iter().map(|s| s.to_string()).collect(),
        });
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;

    fn set(entries: &[(&str, &str)]) -> DomainRecordSet {
        let mut set = DomainRecordSet::new();
        for (domain, ip) in entries {
            set.push(domain, ResourceRecord::new(*domain, 60, RecordData::A(ip.parse().unwrap())));
        }
        set
    }

    fn owner() -> Arc<str> {
        Arc::from("q.lan.")
    }

    #[test]
    fn test_find_entry_strips_labels() {
        let records = set(&[("printer.lan", "192.168.178.3")]);
        let cancel = CancellationToken::new();

        let (found, stripped) = find_entry(&records, "my.printer.lan", &cancel).unwrap().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(stripped, 1);
        assert!(find_entry(&records, "notprinter.lan", &cancel).unwrap().is_none());
        assert!(find_entry(&records, "", &cancel).unwrap().is_none());
    }

    #[test]
    fn test_find_entry_observes_cancellation() {
        let records = set(&[("printer.lan", "192.168.178.3")]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(
            find_entry(&records, "my.printer.lan", &cancel),
            Err(DomainError::Cancelled)
        );
    }

    #[test]
    fn test_address_family_must_match() {
        let v4 = ResourceRecord::new("a.lan", 60, RecordData::A("10.0.0.1".parse().unwrap()));

        assert!(matches!(
            process_record(&v4, &owner(), RecordType::A).unwrap(),
            Processed::Answer(ref rr) if rr.name.as_ref() == "q.lan."
        ));
        assert_eq!(process_record(&v4, &owner(), RecordType::AAAA).unwrap(), Processed::Skip);
        assert_eq!(process_record(&v4, &owner(), RecordType::TXT).unwrap(), Processed::Skip);
    }

    #[test]
    fn test_alias_for_cname_query_is_not_followed() {
        let alias = ResourceRecord::new("a.lan", 60, RecordData::CNAME(Arc::from("b.lan")));

        let Processed::Alias { record, follow } =
            process_record(&alias, &owner(), RecordType::CNAME).unwrap()
        else {
            panic!("expected alias");
        };
        assert_eq!(record.data, RecordData::CNAME(Arc::from("b.lan.")));
        assert!(follow.is_none());

        let Processed::Alias { follow, .. } = process_record(&alias, &owner(), RecordType::A).unwrap()
        else {
            panic!("expected alias");
        };
        assert_eq!(follow.as_deref(), Some("b.lan"));
    }

    #[test]
    fn test_opaque_record_is_unsupported() {
        let mx = ResourceRecord::new(
            "mx.lan",
            60,
            RecordData::Opaque {
                mnemonic: CompactString::new("MX"),
                rdata: Arc::from("10 mail.lan."),
            },
        );
        assert_eq!(
            process_record(&mx, &owner(), RecordType::MX),
            Err(DomainError::UnsupportedRecordType("MX".into()))
        );
    }

    #[test]
    fn test_extend_chain_detects_loops_and_depth() {
        let x: Arc<str> = Arc::from("x.lan");
        let y: Arc<str> = Arc::from("y.lan");

        let chain = extend_chain(&[], &y).unwrap();
        let chain = extend_chain(&chain, &x).unwrap();
        assert_eq!(
            extend_chain(&chain, &y),
            Err(DomainError::AliasLoop(vec!["y.lan".into(), "x.lan".into(), "y.lan".into()]))
        );

        let long: Vec<Arc<str>> = (0..MAX_ALIAS_DEPTH)
            .map(|i| Arc::from(format!("h{i}.lan")))
            .collect();
        assert!(matches!(
            extend_chain(&long, &x),
            Err(DomainError::AliasDepthExceeded { max: MAX_ALIAS_DEPTH, .. })
        ));
    }
}

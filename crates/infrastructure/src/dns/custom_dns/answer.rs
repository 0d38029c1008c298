use hickory_proto::rr::Name;
use splitdns_domain::dns_record::fqdn;
use splitdns_domain::DomainError;
use std::sync::Arc;

/// Owner name for answers to `question`: fully qualified, case preserved.
///
/// Fails when the name could not be put on the wire (empty labels, labels
/// over 63 octets, names over 255 octets).
pub(crate) fn answer_owner(question: &str) -> Result<Arc<str>, DomainError> {
    let owner = fqdn(question.trim());
    Name::from_ascii(&owner).map_err(|e| {
        DomainError::AnswerSynthesis(format!("cannot use '{}' as answer owner: {}", owner, e))
    })?;
    Ok(Arc::from(owner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_fully_qualified_and_keeps_case() {
        assert_eq!(answer_owner("My.Printer.lan").unwrap().as_ref(), "My.Printer.lan.");
        assert_eq!(answer_owner("printer.lan.").unwrap().as_ref(), "printer.lan.");
    }

    #[test]
    fn test_overlong_label_fails() {
        let label = "a".repeat(64);
        let err = answer_owner(&format!("{label}.printer.lan")).unwrap_err();
        assert!(matches!(err, DomainError::AnswerSynthesis(_)));
    }
}

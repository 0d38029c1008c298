use splitdns_domain::RewriteRule;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

/// Literal substring rewrite of query domains.
///
/// Rules are tried in declaration order; the first rule whose source occurs
/// in the domain replaces every occurrence of it and ends the scan. Sources
/// are plain text, never patterns.
#[derive(Debug, Clone, Default)]
pub struct DomainRewriter {
    rules: Arc<[RewriteRule]>,
}

impl DomainRewriter {
    pub fn new(rules: &[RewriteRule]) -> Self {
        let rules: Vec<RewriteRule> = rules
            .iter()
            .filter(|rule| !rule.from.is_empty())
            .map(|rule| {
                RewriteRule::new(
                    rule.from.to_ascii_lowercase(),
                    rule.to.to_ascii_lowercase(),
                )
            })
            .collect();
        Self {
            rules: Arc::from(rules),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrites a normalized (lower-case) domain.
    pub fn rewrite<'a>(&self, domain: &'a str) -> Cow<'a, str> {
        for rule in self.rules.iter() {
            if domain.contains(rule.from.as_ref()) {
                let rewritten = domain.replace(rule.from.as_ref(), &rule.to);
                debug!(
                    original = %domain,
                    rewritten = %rewritten,
                    "Rewrite rule applied"
                );
                return Cow::Owned(rewritten);
            }
        }
        Cow::Borrowed(domain)
    }
}

use super::answer::answer_owner;
use super::group_store::GroupStore;
use super::processor::{extend_chain, find_entry, process_record, Processed};
use super::reverse_index::ReverseIndex;
use async_trait::async_trait;
use splitdns_application::ports::{DnsResolver, DnsResponse};
use splitdns_application::services::ClientGroupResolver;
use splitdns_domain::dns_record::{fqdn, normalize_domain};
use splitdns_domain::{
    CompiledCustomDns, DnsRequest, DomainError, RecordData, RecordType, ResourceRecord,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

type ResolveFuture<'a> = Pin<Box<dyn Future<Output = Result<DnsResponse, DomainError>> + Send + 'a>>;

/// Resolver stage answering from locally configured records.
///
/// PTR queries are answered from the reverse index alone. Everything else
/// is matched against the requesting client's group: rewrite, suffix walk,
/// per-record synthesis, alias recursion. Unmatched queries, and matched
/// ones without a record of the queried type when `filter_unmapped_types`
/// is off, go to `next`.
pub struct CustomDnsResolver {
    groups: GroupStore,
    reverse: ReverseIndex,
    client_groups: ClientGroupResolver,
    ttl: u32,
    filter_unmapped_types: bool,
    next: Arc<dyn DnsResolver>,
}

impl CustomDnsResolver {
    pub fn new(config: &CompiledCustomDns, next: Arc<dyn DnsResolver>) -> Self {
        let groups = GroupStore::new(config);
        let reverse = ReverseIndex::build(&groups);
        let client_groups = ClientGroupResolver::from_compiled(config);

        info!(
            legacy = groups.is_legacy(),
            groups = groups.iter().count(),
            reverse_entries = reverse.len(),
            ttl = config.ttl,
            filter_unmapped_types = config.filter_unmapped_types,
            "Custom DNS resolver ready"
        );

        Self {
            groups,
            reverse,
            client_groups,
            ttl: config.ttl,
            filter_unmapped_types: config.filter_unmapped_types,
            next,
        }
    }

    fn resolve_reverse(&self, request: &DnsRequest) -> Result<DnsResponse, DomainError> {
        let Some(domains) = self.reverse.lookup(&request.query.domain) else {
            debug!(domain = %request.query.domain, "No reverse entry");
            return Ok(DnsResponse::custom_dns(Vec::new()));
        };

        let owner = answer_owner(&request.query.domain)?;
        let answers: Vec<ResourceRecord> = domains
            .iter()
            .map(|domain| {
                ResourceRecord::new(
                    Arc::clone(&owner),
                    self.ttl,
                    RecordData::PTR(Arc::from(fqdn(domain))),
                )
            })
            .collect();

        debug!(
            domain = %request.query.domain,
            answers = answers.len(),
            "Returning reverse custom dns entry"
        );
        Ok(DnsResponse::custom_dns(answers))
    }

    /// Resolves one (sub-)request. `chain` holds the alias targets already
    /// visited for the top-level query and is extended by copy on recursion.
    fn process_request<'a>(
        &'a self,
        request: &'a DnsRequest,
        cancel: &'a CancellationToken,
        chain: Vec<Arc<str>>,
    ) -> ResolveFuture<'a> {
        Box::pin(async move {
            if cancel.is_cancelled() {
                return Err(DomainError::Cancelled);
            }

            let designator = self
                .client_groups
                .resolve(request.client_ip, request.client_name.as_deref());
            let group = self.groups.config_for(&designator);
            let client_group = designator.name().unwrap_or("");

            let normalized = normalize_domain(&request.query.domain);
            let domain = group.rewriter.rewrite(&normalized);

            let Some((entries, stripped)) = find_entry(&group.records, &domain, cancel)? else {
                trace!(
                    domain = %domain,
                    next_resolver = self.next.name(),
                    "go to next resolver"
                );
                return self.next.resolve(request, cancel).await;
            };

            let owner = answer_owner(&request.query.domain)?;
            let qtype = request.query.record_type;
            let mut answers = Vec::with_capacity(entries.len());

            for record in entries {
                match process_record(record, &owner, qtype)? {
                    Processed::Skip => {}
                    Processed::Answer(answer) => answers.push(answer),
                    Processed::Alias { record, follow } => {
                        answers.push(record);
                        if let Some(target) = follow {
                            let next_chain = extend_chain(&chain, &target)?;
                            let sub_request = request.derive(Arc::clone(&target), qtype);
                            let resolved = self
                                .process_request(&sub_request, cancel, next_chain)
                                .await?;
                            answers.extend(resolved.answers);
                        }
                    }
                }
            }

            if !answers.is_empty() {
                debug!(
                    domain = %domain,
                    stripped_labels = stripped,
                    client_group = %client_group,
                    answers = answers.len(),
                    "Returning custom dns entry"
                );
                return Ok(DnsResponse::custom_dns(answers));
            }

            if !self.filter_unmapped_types {
                trace!(
                    domain = %domain,
                    record_type = %qtype,
                    next_resolver = self.next.name(),
                    "No record of this type, go to next resolver"
                );
                return self.next.resolve(request, cancel).await;
            }

            debug!(
                domain = %domain,
                record_type = %qtype,
                client_group = %client_group,
                "No record of this type, returning empty answer"
            );
            Ok(DnsResponse::custom_dns(Vec::new()))
        })
    }
}

#[async_trait]
impl DnsResolver for CustomDnsResolver {
    async fn resolve(
        &self,
        request: &DnsRequest,
        cancel: &CancellationToken,
    ) -> Result<DnsResponse, DomainError> {
        if request.query.record_type == RecordType::PTR {
            return self.resolve_reverse(request);
        }

        self.process_request(request, cancel, Vec::new()).await
    }

    fn name(&self) -> &'static str {
        "custom_dns"
    }
}

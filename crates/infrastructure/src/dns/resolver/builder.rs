use crate::dns::custom_dns::CustomDnsResolver;
use splitdns_application::ports::DnsResolver;
use splitdns_domain::{CompiledCustomDns, ConfigError, CustomDnsConfig};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct ResolverBuilder {
    next: Arc<dyn DnsResolver>,
    custom_dns: Option<CompiledCustomDns>,
}

impl ResolverBuilder {
    /// `next` answers whatever the stages built here pass on.
    pub fn new(next: Arc<dyn DnsResolver>) -> Self {
        Self {
            next,
            custom_dns: None,
        }
    }

    /// Compiles the custom DNS stage. A configuration with nothing to serve
    /// adds no stage.
    pub fn with_custom_dns(
        mut self,
        config: &CustomDnsConfig,
        base_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if !config.is_enabled() {
            info!("Custom DNS not configured, stage skipped");
            return Ok(self);
        }

        config.log_config();
        self.custom_dns = Some(CompiledCustomDns::compile(config, base_dir)?);
        Ok(self)
    }

    pub fn with_compiled_custom_dns(mut self, compiled: CompiledCustomDns) -> Self {
        self.custom_dns = Some(compiled);
        self
    }

    pub fn build(self) -> Arc<dyn DnsResolver> {
        info!(
            custom_dns = self.custom_dns.is_some(),
            next = self.next.name(),
            "Building DNS resolver"
        );

        let mut resolver = self.next;

        if let Some(custom_dns) = self.custom_dns {
            resolver = Arc::new(CustomDnsResolver::new(&custom_dns, resolver));
        }

        info!("DNS resolver built successfully");
        resolver
    }
}

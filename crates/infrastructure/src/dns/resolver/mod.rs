//! Resolver chain assembly
//!
//! Stages are decorators over the next stage, each an
//! `Arc<dyn DnsResolver>`:
//!
//! - **Custom DNS**: locally configured, per client group answers (outermost)
//! - **Next**: whatever the embedding application resolves with; a terminal
//!   [`NoUpstreamResolver`] when nothing else is configured
//!
//! ## Example Usage
//!
//! ```no_run
//! use splitdns_infrastructure::dns::resolver::{NoUpstreamResolver, ResolverBuilder};
//! use std::sync::Arc;
//!
//! # fn build(config: &splitdns_domain::Config) -> Result<(), splitdns_domain::ConfigError> {
//! let resolver = ResolverBuilder::new(Arc::new(NoUpstreamResolver))
//!     .with_custom_dns(&config.custom_dns, config.base_dir())?
//!     .build();
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod no_upstream;

pub use builder::ResolverBuilder;
pub use no_upstream::NoUpstreamResolver;

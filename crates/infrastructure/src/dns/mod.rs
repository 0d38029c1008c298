pub mod custom_dns;
pub mod forwarding;
pub mod resolver;

pub use custom_dns::CustomDnsResolver;
pub use resolver::{NoUpstreamResolver, ResolverBuilder};

mod client_group_resolver;
mod domain_rewriter;

pub use client_group_resolver::{ClientGroupResolver, GroupDesignator};
pub use domain_rewriter::DomainRewriter;

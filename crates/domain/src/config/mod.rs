//! Configuration module for Splitdns
//!
//! This module contains all configuration structures organized by domain:
//! - `root`: Main configuration, file loading and validation
//! - `custom_dns`: Local records, client groups, rewrite rules, migration
//! - `compiled`: Immutable, load-time compiled form of `custom_dns`
//! - `ordered`: Declaration-order preserving map used by the schema
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod compiled;
pub mod custom_dns;
pub mod errors;
pub mod logging;
pub mod ordered;
pub mod root;

pub use compiled::{CompiledCustomDns, CompiledGroup, GroupMode};
pub use custom_dns::{AddressList, CustomDnsConfig, CustomDnsGroup, RewriteRule, ZoneBlobs};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use ordered::OrderedMap;
pub use root::{CliOverrides, Config};

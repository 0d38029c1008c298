//! Zone-file compiler.
//!
//! Turns master-file text (RFC 1035 §5 subset) into a [`DomainRecordSet`]
//! once, at configuration load time:
//!
//! - `$ORIGIN <name>`, `$TTL <ttl>`, `$INCLUDE <path> [origin]`
//! - `<owner> [ttl] [class] <type> <rdata>` (ttl and class in either order)
//! - `@`, blank owners, `;` comments, quoted strings, `( ... )` continuation
//! - `\X` and `\DDD` escapes (an escaped `.` inside a label is rejected)
//!
//! Parsing is all-or-nothing: any error discards the whole blob.
//!
//! [`DomainRecordSet`]: crate::dns_record::DomainRecordSet

mod compiler;
mod tokenizer;

pub use compiler::ZoneCompiler;
pub(crate) use compiler::parse_ttl;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("zone: {message} (at {source_name}:{line})")]
pub struct ZoneParseError {
    /// `<inline>` for the configuration blob, otherwise the included path.
    pub source_name: String,
    pub line: usize,
    pub message: String,
}

impl ZoneParseError {
    pub(crate) fn new(source_name: &str, line: usize, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.to_string(),
            line,
            message: message.into(),
        }
    }
}
